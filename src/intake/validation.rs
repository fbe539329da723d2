use thiserror::Error;

/// MIME types the score extraction accepts.
pub const ACCEPTED_TYPES: [&str; 4] = ["image/jpeg", "image/jpg", "image/png", "application/pdf"];

const BYTES_PER_MB: u64 = 1024 * 1024;

/// Rejections carry the exact text shown in the upload status banner.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntakeError {
    #[error("지원하지 않는 파일 형식입니다. PDF, JPG, PNG 파일만 가능합니다.")]
    UnsupportedType { mime: String },
    #[error("파일 크기가 너무 큽니다. {limit_mb}MB 이하의 파일만 업로드 가능합니다.")]
    TooLarge { size: u64, limit_mb: u64 },
}

/// Type is checked before size, so an oversized file of the wrong type
/// reports the type.
pub fn validate_upload(mime: &str, size: u64, limit_mb: u64) -> Result<(), IntakeError> {
    if !ACCEPTED_TYPES.contains(&mime) {
        return Err(IntakeError::UnsupportedType { mime: mime.to_string() });
    }

    if size > limit_mb.saturating_mul(BYTES_PER_MB) {
        return Err(IntakeError::TooLarge { size, limit_mb });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIB: u64 = 1024 * 1024;

    #[test]
    fn oversized_pdf_is_rejected() {
        let result = validate_upload("application/pdf", 21 * MIB, 20);
        assert_eq!(result, Err(IntakeError::TooLarge { size: 21 * MIB, limit_mb: 20 }));
        assert_eq!(
            result.unwrap_err().to_string(),
            "파일 크기가 너무 큽니다. 20MB 이하의 파일만 업로드 가능합니다."
        );
    }

    #[test]
    fn png_under_the_limit_is_accepted() {
        assert!(validate_upload("image/png", 19 * MIB, 20).is_ok());
        assert!(validate_upload("image/jpeg", 20 * MIB, 20).is_ok());
    }

    #[test]
    fn plain_text_is_rejected_at_any_size() {
        for size in [0, 1, 21 * MIB] {
            let result = validate_upload("text/plain", size, 20);
            assert!(matches!(result, Err(IntakeError::UnsupportedType { .. })));
        }
    }

    #[test]
    fn type_match_is_exact() {
        assert!(validate_upload("IMAGE/PNG", 10, 20).is_err());
        assert!(validate_upload("image/gif", 10, 20).is_err());
        assert!(validate_upload("image/jpg", 10, 20).is_ok());
    }
}
