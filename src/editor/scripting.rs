//! HTML snippets that load the CMS in-page editor.

use std::borrow::Cow;

/// Script tag for JSON/Standalone integrations, pointing at the CMS that
/// opened the page (the `jshcms_url` parameter).
pub fn editor_script(cms_server_url: &str) -> String {
    let src = format!("{cms_server_url}js/jsHarmonyCMS.js");
    format!(
        r#"<script type="text/javascript" src="{}"></script>"#,
        escape_attr(&src)
    )
}

/// Script tags for remote template integrations: load the launcher served at
/// `launcher_path` and hand it the CMS access key.
pub fn remote_template_integration(launcher_path: &str, access_key: &str) -> String {
    let config = serde_json::json!({ "access_keys": [access_key] }).to_string();
    format!(
        r#"<script type="text/javascript" class="removeOnPublish" src="{}"></script>
<script type="text/javascript" class="removeOnPublish">
jsHarmonyCmsEditor({});
</script>"#,
        escape_attr(launcher_path),
        config.replace("</", "<\\/")
    )
}

fn escape_char(c: char) -> Option<&'static str> {
    match c {
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '&' => Some("&amp;"),
        '"' => Some("&quot;"),
        '\'' => Some("&#39;"),
        _ => None,
    }
}

/// Escape a value for a double- or single-quoted HTML attribute.
pub fn escape_attr(s: &str) -> Cow<'_, str> {
    if !s.contains(['<', '>', '&', '"', '\'']) {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match escape_char(c) {
            Some(entity) => result.push_str(entity),
            None => result.push(c),
        }
    }
    Cow::Owned(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_editor_script() {
        let script = editor_script("//cms.server/");
        assert_eq!(
            script,
            r#"<script type="text/javascript" src="//cms.server/js/jsHarmonyCMS.js"></script>"#
        );
    }

    #[test]
    fn test_editor_script_escapes_origin() {
        let script = editor_script(r#"https://cms.example.com/"><script>alert(1)</script>"#);
        assert!(!script.contains("<script>alert"));
        assert!(script.contains("&quot;&gt;&lt;script&gt;"));
    }

    #[test]
    fn test_remote_template_integration() {
        let script = remote_template_integration("/.jsHarmonyCms/jsHarmonyCmsEditor.js", "token");
        assert!(script.contains(r#"src="/.jsHarmonyCms/jsHarmonyCmsEditor.js""#));
        assert!(script.contains(r#"jsHarmonyCmsEditor({"access_keys":["token"]});"#));
    }

    #[test]
    fn test_remote_template_integration_cannot_close_script() {
        let script = remote_template_integration("launcher", "</script><script>x()");
        assert_eq!(script.matches("</script>").count(), 2);
    }

    #[test]
    fn test_escape_attr_borrows_clean_input() {
        assert!(matches!(escape_attr("plain"), Cow::Borrowed("plain")));
        assert_eq!(escape_attr("a&b"), "a&amp;b");
    }
}
