//! Image hosting for event pictures.
//!
//! Event creation never fails because of the image host: callers go
//! through [`upload_or_placeholder`], which substitutes
//! [`PLACEHOLDER_IMAGE_URL`] when no file was attached, no host is
//! configured, or the upload fails.

pub mod cloudinary;

use std::collections::BTreeMap;
use std::fmt;

use async_trait::async_trait;
use sha1::{Digest, Sha1};

pub use cloudinary::CloudinaryImageHost;

use crate::error::GatewayError;

/// Image URL stored when no hosted image is available.
pub const PLACEHOLDER_IMAGE_URL: &str = "https://via.placeholder.com/150";

/// Tag and upload preset applied to every uploaded event image.
pub const UPLOAD_TAG: &str = "dev-events";

/// A file received with an event creation request.
#[derive(Clone)]
pub struct ImageFile {
    /// Client-supplied file name.
    pub filename: String,
    /// Raw file contents.
    pub bytes: Vec<u8>,
}

impl fmt::Debug for ImageFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageFile")
            .field("filename", &self.filename)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Remote storage that turns image bytes into a public URL.
#[async_trait]
pub trait ImageHost: Send + Sync + fmt::Debug {
    /// Uploads one image and returns its public HTTPS URL.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ImageUpload`] if the host rejects the file
    /// or cannot be reached.
    async fn upload(&self, image: ImageFile) -> Result<String, GatewayError>;
}

/// Uploads `image` if both it and a host are present, otherwise (or on
/// failure) returns [`PLACEHOLDER_IMAGE_URL`].
pub async fn upload_or_placeholder(
    host: Option<&dyn ImageHost>,
    image: Option<ImageFile>,
) -> String {
    let (Some(host), Some(image)) = (host, image) else {
        return PLACEHOLDER_IMAGE_URL.to_string();
    };
    if image.bytes.is_empty() {
        return PLACEHOLDER_IMAGE_URL.to_string();
    }
    let filename = image.filename.clone();
    match host.upload(image).await {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!(error = %e, %filename, "image upload failed, using placeholder");
            PLACEHOLDER_IMAGE_URL.to_string()
        }
    }
}

/// Computes the Cloudinary request signature for `params`.
///
/// Empty values are skipped; the rest are joined as `key=value` pairs in
/// key order, separated by `&`, with `secret` appended. The result is the
/// hex-encoded SHA-1 digest of that string, the default algorithm for
/// Cloudinary accounts.
#[must_use]
pub fn sign_params(params: &BTreeMap<String, String>, secret: &str) -> String {
    let to_sign = params
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha1::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[derive(Debug, Default)]
    struct FakeHost {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl ImageHost for FakeHost {
        async fn upload(&self, image: ImageFile) -> Result<String, GatewayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(GatewayError::ImageUpload("quota exceeded".to_string()));
            }
            Ok(format!("https://cdn.example.com/{}", image.filename))
        }
    }

    fn png() -> ImageFile {
        ImageFile {
            filename: "cover.png".to_string(),
            bytes: vec![0x89, b'P', b'N', b'G'],
        }
    }

    #[tokio::test]
    async fn uploads_when_host_and_file_present() {
        let host = FakeHost::default();
        let url = upload_or_placeholder(Some(&host), Some(png())).await;
        assert_eq!(url, "https://cdn.example.com/cover.png");
        assert_eq!(host.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn falls_back_to_placeholder() {
        let failing = FakeHost {
            fail: true,
            ..FakeHost::default()
        };
        assert_eq!(
            upload_or_placeholder(Some(&failing), Some(png())).await,
            PLACEHOLDER_IMAGE_URL
        );
        assert_eq!(upload_or_placeholder(None, Some(png())).await, PLACEHOLDER_IMAGE_URL);

        let idle = FakeHost::default();
        assert_eq!(upload_or_placeholder(Some(&idle), None).await, PLACEHOLDER_IMAGE_URL);
        assert_eq!(idle.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn signature_sorts_params_and_appends_secret() {
        let params = BTreeMap::from([
            ("timestamp".to_string(), "1315060510".to_string()),
            ("public_id".to_string(), "sample_image".to_string()),
            ("eager".to_string(), "w_400,h_300,c_pad|w_260,h_200,c_crop".to_string()),
        ]);
        assert_eq!(
            sign_params(&params, "abcd"),
            "bfd09f95f331f558cbd1320e67aa8d488770583e"
        );
    }

    #[test]
    fn signature_skips_empty_values() {
        let with_empty = BTreeMap::from([
            ("a".to_string(), "1".to_string()),
            ("b".to_string(), String::new()),
        ]);
        let without = BTreeMap::from([("a".to_string(), "1".to_string())]);
        assert_eq!(sign_params(&with_empty, "s"), sign_params(&without, "s"));
        assert_eq!(sign_params(&without, "s").len(), 40);
    }
}
