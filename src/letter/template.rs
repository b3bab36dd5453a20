//! Letter templates.
//!
//! A template is HTML with `{{ variable }}` placeholders. The template is
//! parsed once when loaded: an unclosed `{{` or an unknown variable name is
//! reported then, with its line number, instead of producing a broken letter
//! for every attendee.
//!
//! Available variables:
//! - `id` — attendee id
//! - `name` — first name
//! - `zipcode` — normalized zipcode
//! - `phone` — normalized phone, empty when unusable
//! - `legislators` — HTML fragment listing the officials, or the fallback
//!   message

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::model::{Official, Representatives};

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Failed to read template {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Unclosed placeholder on line {line}")]
    Unclosed { line: usize },
    #[error("Unknown template variable '{name}' on line {line}")]
    UnknownVariable { name: String, line: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Variable {
    Id,
    Name,
    Zipcode,
    Phone,
    Legislators,
}

impl Variable {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "id" => Some(Variable::Id),
            "name" => Some(Variable::Name),
            "zipcode" => Some(Variable::Zipcode),
            "phone" => Some(Variable::Phone),
            "legislators" => Some(Variable::Legislators),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Var(Variable),
}

/// Values for one letter.
#[derive(Debug, Clone, Copy)]
pub struct LetterVars<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub zipcode: &'a str,
    pub phone: &'a str,
    pub representatives: &'a Representatives,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LetterTemplate {
    segments: Vec<Segment>,
}

impl LetterTemplate {
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        let line_at = |offset: usize| source[..offset].matches('\n').count() + 1;

        let mut segments = Vec::new();
        let mut pos = 0;
        while let Some(found) = source[pos..].find(OPEN) {
            let open = pos + found;
            if open > pos {
                segments.push(Segment::Text(source[pos..open].to_string()));
            }

            let inner_start = open + OPEN.len();
            let close = source[inner_start..]
                .find(CLOSE)
                .map(|i| inner_start + i)
                .ok_or(TemplateError::Unclosed { line: line_at(open) })?;

            let name = source[inner_start..close].trim();
            let var = Variable::from_name(name).ok_or_else(|| TemplateError::UnknownVariable {
                name: name.to_string(),
                line: line_at(open),
            })?;
            segments.push(Segment::Var(var));
            pos = close + CLOSE.len();
        }
        if pos < source.len() {
            segments.push(Segment::Text(source[pos..].to_string()));
        }

        Ok(LetterTemplate { segments })
    }

    pub fn from_file(path: &Path) -> Result<Self, TemplateError> {
        let source = fs::read_to_string(path).map_err(|source| TemplateError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&source)
    }

    pub fn render(&self, vars: &LetterVars) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Var(Variable::Id) => out.push_str(&html_escape(vars.id)),
                Segment::Var(Variable::Name) => out.push_str(&html_escape(vars.name)),
                Segment::Var(Variable::Zipcode) => out.push_str(&html_escape(vars.zipcode)),
                Segment::Var(Variable::Phone) => out.push_str(&html_escape(vars.phone)),
                Segment::Var(Variable::Legislators) => {
                    out.push_str(&render_legislators(vars.representatives))
                }
            }
        }
        out
    }
}

/// HTML fragment for the `legislators` variable.
pub fn render_legislators(representatives: &Representatives) -> String {
    match representatives {
        Representatives::Fallback(message) => format!("<p>{}</p>", html_escape(message)),
        Representatives::Officials(officials) => {
            let items: String = officials.iter().map(render_official).collect();
            format!("<ul class=\"legislators\">\n{}</ul>", items)
        }
    }
}

fn render_official(official: &Official) -> String {
    let mut item = format!("  <li>{}", html_escape(&official.name));
    if let Some(party) = &official.party {
        item.push_str(&format!(" ({})", html_escape(party)));
    }
    if let Some(url) = official.urls.first() {
        let url = html_escape(url);
        item.push_str(&format!(" <a href=\"{}\">{}</a>", url, url));
    }
    item.push_str("</li>\n");
    item
}

/// Simple HTML escaping for template values.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
