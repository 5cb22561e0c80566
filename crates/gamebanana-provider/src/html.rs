use html2text::render::text_renderer::TrivialDecorator;
use tracing::warn;

/// Converts the HTML bodies GameBanana serves into the two shapes packages
/// carry: plain text for short descriptions, Markdown for readmes.
pub trait HtmlConverter: Send + Sync {
    fn to_plain_text(&self, html: &str) -> String;
    fn to_markdown(&self, html: &str) -> String;
}

/// Wide enough that html2text never hard-wraps a description.
const PLAIN_TEXT_WIDTH: usize = 4096;

#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultHtmlConverter;

impl HtmlConverter for DefaultHtmlConverter {
    fn to_plain_text(&self, html: &str) -> String {
        if html.trim().is_empty() {
            return String::new();
        }
        match html2text::config::with_decorator(TrivialDecorator::new())
            .string_from_read(html.as_bytes(), PLAIN_TEXT_WIDTH)
        {
            Ok(text) => text.trim().to_string(),
            Err(err) => {
                warn!("failed to convert HTML to plain text: {err}");
                html.to_string()
            }
        }
    }

    fn to_markdown(&self, html: &str) -> String {
        if html.trim().is_empty() {
            return String::new();
        }
        match htmd::convert(html) {
            Ok(markdown) => markdown.trim().to_string(),
            Err(err) => {
                warn!("failed to convert HTML to Markdown: {err}");
                html.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_drops_markup() {
        let text = DefaultHtmlConverter.to_plain_text("<p>Hello <b>world</b></p>");
        assert_eq!(text, "Hello world");
    }

    #[test]
    fn markdown_keeps_emphasis() {
        let markdown = DefaultHtmlConverter.to_markdown("<p>Hello <strong>world</strong></p>");
        assert_eq!(markdown, "Hello **world**");
    }

    #[test]
    fn blank_input_converts_to_empty() {
        assert_eq!(DefaultHtmlConverter.to_plain_text("  "), "");
        assert_eq!(DefaultHtmlConverter.to_markdown(""), "");
    }
}
