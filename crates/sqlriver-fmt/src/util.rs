//! Line model and river alignment.

use sqlriver_syntax::ast::Comment;

/// One output line of a river-aligned statement: an optional clause keyword
/// (aligned on its first word), a payload, and an optional trailing comment.
pub(crate) struct Line {
    pub kw: String,
    pub text: String,
    pub comment: Option<String>,
}

impl Line {
    pub fn new(kw: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            kw: kw.into(),
            text: text.into(),
            comment: None,
        }
    }

    pub fn with_comment(mut self, comment: Option<&Comment>) -> Self {
        if let Some(c) = comment {
            self.comment = Some(c.text.trim_end().to_string());
        }
        self
    }

    /// A continuation line, indented past the river.
    pub fn cont(text: impl Into<String>) -> Self {
        Self::new("", text)
    }
}

/// A fully laid-out line whose trailing comment is still separate, so that
/// punctuation (the statement terminator) can be appended to the code part
/// without landing inside a `--` comment.
pub(crate) struct Rendered {
    pub text: String,
    pub comment: Option<String>,
}

impl Rendered {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            comment: None,
        }
    }

    pub fn flush(&self) -> String {
        match &self.comment {
            Some(comment) if self.text.trim().is_empty() => comment.clone(),
            Some(comment) => format!("{} {}", self.text.trim_end(), comment),
            None => self.text.trim_end().to_string(),
        }
    }
}

pub(crate) fn first_word_len(kw: &str) -> usize {
    kw.split_whitespace().next().map_or(0, str::len)
}

/// Right-align every keyword's first word to the river column and indent
/// continuations one column past it.
pub(crate) fn render_lines(lines: &[Line]) -> Vec<Rendered> {
    let river = lines
        .iter()
        .filter(|l| !l.kw.is_empty())
        .map(|l| first_word_len(&l.kw))
        .max()
        .unwrap_or(0);
    let mut rendered = Vec::with_capacity(lines.len());
    for line in lines {
        let mut s = String::new();
        if line.kw.is_empty() {
            for _ in 0..river + 1 {
                s.push(' ');
            }
            s.push_str(&line.text);
        } else {
            for _ in 0..river.saturating_sub(first_word_len(&line.kw)) {
                s.push(' ');
            }
            s.push_str(&line.kw);
            if !line.text.is_empty() {
                s.push(' ');
                s.push_str(&line.text);
            }
        }
        rendered.push(Rendered {
            text: s.trim_end().to_string(),
            comment: line.comment.clone(),
        });
    }
    rendered
}

/// Inline rendering of a comment: line comments become block comments so
/// they cannot swallow the rest of the line.
pub(crate) fn comment_inline(comment: &Comment) -> String {
    if comment.is_line() {
        let body = comment.text.trim_start_matches(['-', '#', '/']).trim();
        format!("/* {body} */")
    } else {
        comment.text.clone()
    }
}
