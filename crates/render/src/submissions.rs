use models::Submission;

use crate::format::Formatter;
use crate::html::{http_href, text};

pub const EMPTY_SUBMISSIONS: &str = "<p>No submissions found for that filter.</p>";

/// Admin review list, one `<article>` per submission.
pub fn render_submissions(items: &[Submission], fmt: &Formatter) -> String {
    if items.is_empty() {
        return EMPTY_SUBMISSIONS.to_string();
    }
    items.iter().map(|item| render_submission(item, fmt)).collect()
}

fn render_submission(item: &Submission, fmt: &Formatter) -> String {
    let mut meta = Vec::with_capacity(2);
    if let Some(handle) = item.social_handle.as_deref().filter(|h| !h.is_empty()) {
        meta.push(handle.to_string());
    }
    meta.push(format!("Submitted {}", fmt.date_time(&item.created_at)));

    let mut out = String::from(r#"<article class="submission">"#);
    out.push_str(&format!(
        "<h2>{} · {}</h2>",
        text(&item.name),
        text(&item.country)
    ));
    out.push_str(&format!(r#"<div class="meta">{}</div>"#, text(&meta.join(" · "))));
    if let Some(href) = http_href(&item.video_url) {
        out.push_str(&format!(
            r#"<a href="{href}" target="_blank" rel="noopener">Watch audition video</a>"#
        ));
    }
    if let Some(message) = item.message.as_deref().filter(|m| !m.is_empty()) {
        out.push_str(&format!(r#"<p class="message">{}</p>"#, text(message)));
    }
    out.push_str("</article>");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn submission() -> Submission {
        Submission {
            id: "abc".into(),
            name: "Ada".into(),
            country: "NG".into(),
            social_handle: Some("@ada".into()),
            video_url: "https://video.example/1".into(),
            message: Some("hello".into()),
            created_at: "2024-03-05T14:07:09Z".into(),
        }
    }

    #[test]
    fn test_empty_list_placeholder() {
        assert_eq!(render_submissions(&[], &Formatter::default()), EMPTY_SUBMISSIONS);
    }

    #[test]
    fn test_full_submission_markup() {
        let html = render_submissions(&[submission()], &Formatter::default());
        assert_eq!(
            html,
            concat!(
                r#"<article class="submission"><h2>Ada · NG</h2>"#,
                r#"<div class="meta">@ada · Submitted 3/5/2024, 2:07:09 PM</div>"#,
                r#"<a href="https://video.example/1" target="_blank" rel="noopener">Watch audition video</a>"#,
                r#"<p class="message">hello</p></article>"#
            )
        );
    }

    #[test]
    fn test_optional_fields_are_skipped() {
        let mut item = submission();
        item.social_handle = Some(String::new());
        item.message = None;
        item.created_at = "whenever".into();

        let html = render_submissions(&[item], &Formatter::default());
        assert!(html.contains(r#"<div class="meta">Submitted whenever</div>"#));
        assert!(!html.contains("message"));
    }

    #[test]
    fn test_values_are_encoded() {
        let mut item = submission();
        item.name = "<script>alert(1)</script>".into();
        item.video_url = r#"x" onmouseover="steal()"#.into();

        let html = render_submissions(&[item], &Formatter::default());
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains(r#"" onmouseover=""#));
    }

    #[test]
    fn test_non_http_video_link_is_omitted() {
        let mut item = submission();
        item.video_url = "javascript:alert(1)".into();

        let html = render_submissions(&[item], &Formatter::default());
        assert!(!html.contains("javascript:"));
        assert!(!html.contains("Watch audition video"));
    }
}
