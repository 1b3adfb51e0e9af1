//! Form projection: the editable form rendered from the session model.
//!
//! Entry blocks follow store order and each category's "add another" button
//! is written after its last entry, so a newly added entry always appears
//! directly before it.

use crate::entries::{compose_key, Category, Entry};
use crate::models::form::{EMAIL, FULL_NAME, LINKEDIN, PHONE, SKILLS, SUMMARY};
use crate::preview::escape_html;
use crate::session::Session;

const TOP_LEVEL_INPUTS: &[(&str, &str, bool)] = &[
    (FULL_NAME, "Full Name:", false),
    (SUMMARY, "Professional Summary:", true),
    (EMAIL, "Email:", false),
    (PHONE, "Phone:", false),
    (LINKEDIN, "LinkedIn URL:", false),
];

fn section_id(category: Category) -> &'static str {
    match category {
        Category::Employment => "work-experience-section",
        Category::Education => "education-section",
    }
}

fn entry_class(category: Category) -> &'static str {
    match category {
        Category::Employment => "experience-entry",
        Category::Education => "education-entry",
    }
}

fn entry_heading(category: Category) -> (&'static str, &'static str) {
    match category {
        Category::Employment => ("Job", "Remove Job"),
        Category::Education => ("School", "Remove School"),
    }
}

fn add_button(category: Category) -> (&'static str, &'static str) {
    match category {
        Category::Employment => ("addWorkExpBtn", "Add Another Job"),
        Category::Education => ("addEducationBtn", "Add Another School"),
    }
}

fn write_input(html: &mut String, key: &str, label: &str, value: &str, multiline: bool) {
    let key = escape_html(key);
    let value = escape_html(value);
    html.push_str(&format!(r#"<label for="{key}">{}</label>"#, escape_html(label)));
    if multiline {
        html.push_str(&format!(
            r#"<textarea id="{key}" name="{key}" rows="3">{value}</textarea>"#
        ));
    } else {
        html.push_str(&format!(
            r#"<input type="text" id="{key}" name="{key}" value="{value}">"#
        ));
    }
}

fn write_entry(html: &mut String, category: Category, entry: &Entry) {
    let (noun, remove_label) = entry_heading(category);
    let id = entry.id;
    html.push_str(&format!(
        r#"<div class="{}" data-id="{id}"><hr><h3>{noun} #{id}</h3>"#,
        entry_class(category)
    ));
    for &field in category.fields() {
        write_input(
            html,
            &compose_key(field, id),
            field.label(),
            entry.raw(field),
            field.is_multiline(),
        );
    }
    html.push_str(&format!(
        r#"<button type="button" class="remove-field-btn" data-type="{}" data-id="{id}">{remove_label}</button></div>"#,
        category.tag()
    ));
}

/// Renders the whole form for `session`.
pub fn render_form_html(session: &Session) -> String {
    let form = session.form_data();
    let mut html = String::from(r#"<form id="resumeForm">"#);

    for &(key, label, multiline) in TOP_LEVEL_INPUTS {
        write_input(&mut html, key, label, form.raw(key), multiline);
    }

    for category in Category::ALL {
        html.push_str(&format!(r#"<div id="{}">"#, section_id(category)));
        for entry in session.entries().list_active(category) {
            write_entry(&mut html, category, entry);
        }
        let (button_id, button_label) = add_button(category);
        html.push_str(&format!(
            r#"<button type="button" id="{button_id}" data-type="{}">{button_label}</button></div>"#,
            category.tag()
        ));
    }

    write_input(
        &mut html,
        SKILLS,
        "Skills (comma-separated):",
        form.raw(SKILLS),
        false,
    );
    html.push_str(r#"<button type="submit">Generate Resume</button></form>"#);
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entries::EntryId;
    use crate::models::form::FormData;

    #[test]
    fn test_new_entry_is_rendered_before_add_button() {
        let mut session = Session::new();
        session.add_entry(Category::Employment);
        let html = render_form_html(&session);

        let job1 = html.find(r#"<h3>Job #1</h3>"#).unwrap();
        let job2 = html.find(r#"<h3>Job #2</h3>"#).unwrap();
        let add = html.find(r#"id="addWorkExpBtn""#).unwrap();
        let edu = html.find(r#"id="education-section""#).unwrap();
        assert!(job1 < job2 && job2 < add && add < edu);
    }

    #[test]
    fn test_removed_entry_is_not_rendered() {
        let mut session = Session::new();
        session.add_entry(Category::Education);
        session.remove_entry(Category::Education, EntryId(1));
        let html = render_form_html(&session);
        assert!(!html.contains("School #1"));
        assert!(html.contains(r#"name="degree2""#));
        assert!(html.contains(r#"data-type="edu" data-id="2">Remove School"#));
    }

    #[test]
    fn test_values_are_escaped_in_inputs() {
        let mut session = Session::new();
        let form: FormData = [
            ("fullName", r#"Jane "JD" Doe"#),
            ("responsibilities1", "</textarea><script>x</script>"),
        ]
        .into_iter()
        .collect();
        session.apply_form(&form);
        let html = render_form_html(&session);
        assert!(html.contains(r#"value="Jane &quot;JD&quot; Doe""#));
        assert!(html.contains("&lt;/textarea&gt;&lt;script&gt;x&lt;/script&gt;</textarea>"));
        assert!(!html.contains("<script>"));
    }
}
