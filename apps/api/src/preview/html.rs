//! HTML projection of a composed preview.
//!
//! Every interpolated value passes through `escape_html`. Only the markup this
//! module writes itself is structural; user text is always data.

use crate::preview::model::{Contact, Preview, PreviewBlock, CONTACT_SEPARATOR};

/// Escapes text for use in element content or a double-quoted attribute.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn render_contact(contact: &Contact) -> String {
    match contact {
        Contact::LinkedIn {
            href: Some(href), ..
        } => format!(
            r#"<a href="{}" target="_blank" rel="noopener noreferrer">LinkedIn</a>"#,
            escape_html(href)
        ),
        other => format!("<span>{}</span>", escape_html(&other.display_text())),
    }
}

/// Renders the preview region's inner HTML.
pub fn render_html(preview: &Preview) -> String {
    let doc = match preview {
        Preview::Document(doc) => doc,
        Preview::Empty { message } => return format!("<p>{}</p>", escape_html(message)),
    };

    let mut html = String::new();
    for block in &doc.blocks {
        render_block(&mut html, block);
    }
    html
}

fn render_block(html: &mut String, block: &PreviewBlock) {
    match block {
        PreviewBlock::Header { name, contacts } => {
            let contact_line = contacts
                .iter()
                .map(render_contact)
                .collect::<Vec<_>>()
                .join(CONTACT_SEPARATOR);
            html.push_str(&format!(
                r#"<div class="resume-header"><h2>{}</h2><div class="contact-info">{}</div></div><div class="section-divider"></div>"#,
                escape_html(name),
                contact_line
            ));
        }
        PreviewBlock::Summary { text } => html.push_str(&format!(
            r#"<div class="resume-section summary"><h3>Professional Summary</h3><p>{}</p></div>"#,
            escape_html(text)
        )),
        PreviewBlock::Employment { jobs } => {
            html.push_str(r#"<div class="section-divider"></div><div class="resume-section work-experience"><h3>Work Experience</h3>"#);
            for job in jobs {
                html.push_str(&format!(
                    r#"<div class="job-entry"><h4>{} at {} <span class="duration">{}</span></h4>"#,
                    escape_html(&job.title),
                    escape_html(&job.company),
                    escape_html(&job.duration)
                ));
                if !job.bullets.is_empty() {
                    html.push_str("<ul>");
                    for bullet in &job.bullets {
                        html.push_str(&format!("<li>{}</li>", escape_html(bullet)));
                    }
                    html.push_str("</ul>");
                }
                html.push_str("</div>");
            }
            html.push_str("</div>");
        }
        PreviewBlock::Education { schools } => {
            html.push_str(r#"<div class="section-divider"></div><div class="resume-section education"><h3>Education</h3>"#);
            for school in schools {
                html.push_str(&format!(
                    "<p><strong>{}</strong>, {} ({})</p>",
                    escape_html(&school.degree),
                    escape_html(&school.institution),
                    escape_html(&school.year)
                ));
            }
            html.push_str("</div>");
        }
        PreviewBlock::Skills { line, .. } => html.push_str(&format!(
            r#"<div class="section-divider"></div><div class="resume-section skills"><h3>Skills</h3><p class="skill-list">{}</p></div>"#,
            escape_html(line)
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entries::EntryStore;
    use crate::models::form::FormData;
    use crate::preview::composer::{build_draft, compose, EMPTY_PREVIEW_MESSAGE};

    fn render(pairs: &[(&str, &str)]) -> String {
        let form: FormData = pairs.iter().copied().collect();
        render_html(&compose(&build_draft(&EntryStore::default(), &form)))
    }

    #[test]
    fn test_escape_html_covers_markup_characters() {
        assert_eq!(
            escape_html(r#"<a href="x">'&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&#x27;&amp;&#x27;&lt;/a&gt;"
        );
        assert_eq!(escape_html("plain • text"), "plain • text");
    }

    #[test]
    fn test_script_in_summary_renders_as_text() {
        let html = render(&[("summary", "<script>alert(1)</script>")]);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    }

    #[test]
    fn test_quote_in_linkedin_cannot_break_attribute() {
        let html = render(&[
            ("fullName", "Jane"),
            ("linkedin", r#"https://linkedin.com/in/x" onmouseover="alert(1)"#),
        ]);
        assert!(!html.contains(r#"" onmouseover=""#));
        assert!(!html.contains("onmouseover=\"alert"));
    }

    #[test]
    fn test_javascript_linkedin_is_not_a_link() {
        let html = render(&[("fullName", "Jane"), ("linkedin", "javascript:alert(1)")]);
        assert!(!html.contains("<a "));
        assert!(html.contains("<span>LinkedIn: javascript:alert(1)</span>"));
    }

    #[test]
    fn test_header_contact_separators() {
        let html = render(&[
            ("fullName", "Jane Doe"),
            ("email", "j@x.com"),
            ("phone", "555-1234"),
        ]);
        assert!(html.contains("<h2>JANE DOE</h2>"));
        assert!(html.contains(
            r#"<div class="contact-info"><span>Email: j@x.com</span> | <span>Phone: 555-1234</span></div>"#
        ));
    }

    #[test]
    fn test_linkedin_link_rendered_with_https() {
        let html = render(&[("email", "j@x.com"), ("linkedin", "linkedin.com/in/jane")]);
        assert!(html.contains(
            r#"<span>Email: j@x.com</span> | <a href="https://linkedin.com/in/jane" target="_blank" rel="noopener noreferrer">LinkedIn</a>"#
        ));
    }

    #[test]
    fn test_bullets_and_escaped_job_fields() {
        let html = render(&[
            ("jobTitle1", "Dev <b>"),
            ("company1", "A&B"),
            ("responsibilities1", "Built X\n\nShipped Y\n"),
        ]);
        assert!(html.contains("<h4>Dev &lt;b&gt; at A&amp;B <span class=\"duration\"></span></h4>"));
        assert!(html.contains("<ul><li>Built X</li><li>Shipped Y</li></ul>"));
        assert_eq!(html.matches("<li>").count(), 2);
    }

    #[test]
    fn test_no_list_without_responsibilities() {
        let html = render(&[("company1", "Acme")]);
        assert!(!html.contains("<ul>"));
        assert!(html.contains("Job Title at Acme"));
    }

    #[test]
    fn test_skills_line() {
        let html = render(&[("skills", "Go, Rust,  , Python")]);
        assert!(html.contains(r#"<p class="skill-list">Go • Rust • Python</p>"#));
    }

    #[test]
    fn test_empty_preview_renders_message() {
        assert_eq!(render(&[]), format!("<p>{EMPTY_PREVIEW_MESSAGE}</p>"));
    }
}
