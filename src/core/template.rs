// console-attach - core/template.rs
//
// Positional line templates: "{0} of {1}" style placeholders filled from a
// slice of `Display` arguments.
//
// Grammar:
//   {N}      argument N (zero-based)
//   {N,W}    argument N padded to |W| columns; W > 0 right-aligns, W < 0 left-aligns,
//            |W| at most MAX_ALIGNMENT
//   {{ }}    literal braces
//
// `{N:spec}` format specifiers are rejected; callers format the value first.

use crate::util::error::TemplateError;
use std::fmt::Display;

/// Largest accepted `|W|` in `{N,W}`.
pub const MAX_ALIGNMENT: u32 = 1_000_000;

/// A parsed `{index[,alignment]}` placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Placeholder {
    index: usize,
    alignment: i32,
}

impl Placeholder {
    /// Parse the text between the braces. `offset` is the position of the
    /// opening brace, used for error reporting.
    fn parse(body: &str, offset: usize) -> Result<Self, TemplateError> {
        let (head, spec) = match body.split_once(':') {
            Some((head, spec)) => (head, Some(spec)),
            None => (body, None),
        };
        if let Some(spec) = spec {
            return Err(TemplateError::UnsupportedFormatSpecifier {
                offset,
                spec: spec.to_string(),
            });
        }

        let (index_text, alignment_text) = match head.split_once(',') {
            Some((index, alignment)) => (index, Some(alignment)),
            None => (head, None),
        };

        let index = index_text
            .trim()
            .parse::<usize>()
            .map_err(|_| TemplateError::InvalidIndex {
                offset,
                text: index_text.to_string(),
            })?;

        let alignment = match alignment_text {
            Some(text) => text
                .trim()
                .parse::<i32>()
                .map_err(|_| TemplateError::InvalidAlignment {
                    offset,
                    text: text.to_string(),
                })?,
            None => 0,
        };
        if alignment.unsigned_abs() > MAX_ALIGNMENT {
            return Err(TemplateError::InvalidAlignment {
                offset,
                text: alignment_text.unwrap_or_default().to_string(),
            });
        }

        Ok(Self { index, alignment })
    }

    fn render(self, value: &dyn Display, out: &mut String) {
        // Pad the rendered text, not the value: not every Display impl
        // honours the formatter's width.
        let text = value.to_string();
        let width = self.alignment.unsigned_abs() as usize;
        let padding = width.saturating_sub(text.chars().count());
        if self.alignment >= 0 {
            out.extend(std::iter::repeat(' ').take(padding));
            out.push_str(&text);
        } else {
            out.push_str(&text);
            out.extend(std::iter::repeat(' ').take(padding));
        }
    }
}

/// Expand `template`, substituting placeholders with `args`.
///
/// Arguments may be used any number of times or not at all. On error nothing
/// is returned, so a caller never writes a half-expanded line.
pub fn format_positional(template: &str, args: &[&dyn Display]) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.char_indices().peekable();

    while let Some((offset, c)) = chars.next() {
        match c {
            '{' => {
                if chars.next_if(|&(_, next)| next == '{').is_some() {
                    out.push('{');
                    continue;
                }

                let mut body = String::new();
                let mut closed = false;
                for (_, inner) in chars.by_ref() {
                    match inner {
                        '}' => {
                            closed = true;
                            break;
                        }
                        '{' => return Err(TemplateError::UnmatchedOpen { offset }),
                        other => body.push(other),
                    }
                }
                if !closed {
                    return Err(TemplateError::UnmatchedOpen { offset });
                }

                let placeholder = Placeholder::parse(&body, offset)?;
                let value = args
                    .get(placeholder.index)
                    .ok_or(TemplateError::MissingArgument {
                        offset,
                        index: placeholder.index,
                        supplied: args.len(),
                    })?;
                placeholder.render(*value, &mut out);
            }
            '}' => {
                if chars.next_if(|&(_, next)| next == '}').is_some() {
                    out.push('}');
                } else {
                    return Err(TemplateError::UnmatchedClose { offset });
                }
            }
            other => out.push(other),
        }
    }

    Ok(out)
}
