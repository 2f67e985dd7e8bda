//! MIME assembly: one HTML alternative with inline chart images, plus a
//! plaintext fallback.

use anyhow::{Context as _, Result};
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Body, Message, MultiPart, SinglePart};
use sha2::{Digest, Sha256};

const FROM_VAR: &str = "WEEKREV_MAIL_FROM";
const TO_VAR: &str = "WEEKREV_MAIL_TO";

/// Content-ID host label; keeps generated ids syntactically msg-id-like.
const CID_DOMAIN: &str = "weekrev";

#[derive(Debug, Clone)]
pub struct MailConfig {
    pub from: String,
    pub to: String,
}

impl MailConfig {
    pub fn from_env() -> Result<Self> {
        let from = std::env::var(FROM_VAR).with_context(|| format!("{} is not set", FROM_VAR))?;
        let to = std::env::var(TO_VAR).with_context(|| format!("{} is not set", TO_VAR))?;
        Ok(Self { from, to })
    }
}

/// Content-addressed id for an inline image: the section index keeps
/// ids unique even when two sections render identical charts.
pub fn content_id(index: usize, png: &[u8]) -> String {
    let digest = Sha256::digest(png);
    let hash: String = digest[..8].iter().map(|byte| format!("{:02x}", byte)).collect();
    format!("{}.{}@{}", index, hash, CID_DOMAIN)
}

/// Wraps the rendered bodies and chart images into a single message:
/// multipart/alternative of the plaintext part and a multipart/related
/// part holding the HTML plus each PNG addressed by its Content-ID.
pub fn compose_email(
    config: &MailConfig,
    subject: &str,
    html: String,
    text: String,
    images: Vec<(String, Vec<u8>)>,
) -> Result<Message> {
    let png_type = ContentType::parse("image/png").context("image/png content type")?;

    let mut related = MultiPart::related().singlepart(SinglePart::html(html));
    for (cid, png) in images {
        related = related.singlepart(
            Attachment::new_inline(cid).body(Body::new(png), png_type.clone()),
        );
    }

    Message::builder()
        .from(config.from.parse().context("invalid From address")?)
        .to(config.to.parse().context("invalid To address")?)
        .subject(subject)
        .multipart(
            MultiPart::alternative()
                .singlepart(SinglePart::plain(text))
                .multipart(related),
        )
        .context("failed to assemble message")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> MailConfig {
        MailConfig {
            from: "Report Bot <reports@example.org>".to_string(),
            to: "Tech Dept <tech@example.org>".to_string(),
        }
    }

    #[test]
    fn content_ids_are_stable_and_indexed() {
        let png = [0x89, b'P', b'N', b'G'];
        let first = content_id(0, &png);
        assert_eq!(first, content_id(0, &png));
        assert_ne!(first, content_id(1, &png));
        assert!(first.starts_with("0."));
        assert!(first.ends_with("@weekrev"));
    }

    #[test]
    fn message_nests_alternative_and_related_parts() {
        let images = vec![("0.abc@weekrev".to_string(), vec![1, 2, 3])];
        let message = compose_email(
            &config(),
            "Week in Review 2026-08-03",
            "<html><body><img src=\"cid:0.abc@weekrev\"></body></html>".to_string(),
            "totals below".to_string(),
            images,
        )
        .expect("composed message");

        let rendered = String::from_utf8_lossy(&message.formatted()).to_string();
        assert!(rendered.contains("Subject: Week in Review 2026-08-03"));
        assert!(rendered.contains("multipart/alternative"));
        assert!(rendered.contains("multipart/related"));
        assert!(rendered.contains("Content-ID: <0.abc@weekrev>"));
        assert!(rendered.contains("Content-Type: image/png"));
    }

    #[test]
    fn bad_addresses_are_fatal() {
        let bad = MailConfig {
            from: "not an address".to_string(),
            to: "tech@example.org".to_string(),
        };
        assert!(compose_email(&bad, "s", String::new(), String::new(), Vec::new()).is_err());
    }
}
