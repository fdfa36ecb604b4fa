// client/src/api/assist.rs
//
// AI-backed endpoints: the translation layer, journey (exposure ladder)
// generation, and speech-to-text upload.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use shared::types::assist::{
    JourneyGenerateRequest, JourneyGenerateResponse, JourneyProgressSave,
    JourneyProgressWithChallenges, SttResponse, TranslateHistoryItem, TranslateRequest,
    TranslateResponse,
};

use super::{ApiClient, ApiError};

impl ApiClient {
    /// `POST /translate` — re-express military-framed text in
    /// civilian-friendly language.
    pub async fn translate(&self, req: &TranslateRequest) -> Result<TranslateResponse, ApiError> {
        self.post_json("/translate", req).await
    }

    /// `GET /translate/history`
    pub async fn translate_history(
        &self,
        limit: u32,
    ) -> Result<Vec<TranslateHistoryItem>, ApiError> {
        self.get_json(&format!("/translate/history?limit={}", limit))
            .await
    }

    /// `POST /api/journey/challenges/generate` — build a fresh ladder.
    pub async fn generate_journey(
        &self,
        req: &JourneyGenerateRequest,
    ) -> Result<JourneyGenerateResponse, ApiError> {
        self.post_json("/api/journey/challenges/generate", req).await
    }

    /// `GET /api/journey/progress`
    pub async fn journey_progress(&self) -> Result<JourneyProgressWithChallenges, ApiError> {
        self.get_json("/api/journey/progress").await
    }

    /// `POST /api/journey/progress/save`
    pub async fn save_journey_progress(
        &self,
        req: &JourneyProgressSave,
    ) -> Result<JourneyProgressWithChallenges, ApiError> {
        self.post_json("/api/journey/progress/save", req).await
    }

    /// `POST /stt/elevenlabs` — transcribe recorded audio. The endpoint
    /// takes a multipart upload with a single `audio` file field; webm and
    /// wav are accepted.
    pub async fn transcribe(
        &self,
        filename: &str,
        content_type: &str,
        audio: &[u8],
    ) -> Result<SttResponse, ApiError> {
        let (mime, body) = multipart_file("audio", filename, content_type, audio);
        self.post_raw("/stt/elevenlabs", &mime, body).await
    }
}

/// Build a single-file `multipart/form-data` body. The corpus only carries
/// server-side multipart parsing, so the (tiny) writer side lives here.
fn multipart_file(
    field: &str,
    filename: &str,
    content_type: &str,
    data: &[u8],
) -> (String, Vec<u8>) {
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() as u64)
        .unwrap_or(0);
    let boundary = format!(
        "----buddy-{:08x}{:08x}",
        nanos,
        COUNTER.fetch_add(1, Ordering::Relaxed)
    );

    let mut body = Vec::with_capacity(data.len() + 256);
    body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field, filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());

    (
        format!("multipart/form-data; boundary={}", boundary),
        body,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multipart_body_is_well_formed() {
        let (mime, body) = multipart_file("audio", "clip.wav", "audio/wav", b"RIFF");
        let boundary = mime.strip_prefix("multipart/form-data; boundary=").unwrap();
        let text = String::from_utf8_lossy(&body);
        assert!(text.starts_with(&format!("--{}\r\n", boundary)));
        assert!(text.contains("name=\"audio\"; filename=\"clip.wav\""));
        assert!(text.contains("Content-Type: audio/wav\r\n\r\nRIFF"));
        assert!(text.ends_with(&format!("\r\n--{}--\r\n", boundary)));
    }

    #[test]
    fn boundaries_are_unique_per_call() {
        let (a, _) = multipart_file("audio", "a.wav", "audio/wav", b"x");
        let (b, _) = multipart_file("audio", "a.wav", "audio/wav", b"x");
        assert_ne!(a, b);
    }
}
