/*!
 * Tests for error types and conversions
 */

use noveltr::errors::{
    AppError, CatalogError, EngineError, ExtractionError, FetchError, MergeError,
};

#[test]
fn test_fetchError_unreachable_shouldDisplayCorrectly() {
    let error = FetchError::Unreachable("https://example.com/ch-1".to_string());
    let display = format!("{}", error);
    assert!(display.contains("page unreachable"));
    assert!(display.contains("https://example.com/ch-1"));
}

#[test]
fn test_fetchError_status_shouldDisplayCodeAndUrl() {
    let error = FetchError::Status {
        status_code: 404,
        url: "https://example.com/ch-9".to_string(),
    };
    let display = format!("{}", error);
    assert!(display.contains("404"));
    assert!(display.contains("https://example.com/ch-9"));
}

#[test]
fn test_extractionError_elementNotFound_shouldDisplayLocator() {
    let error = ExtractionError::ElementNotFound("div.content".to_string());
    let display = format!("{}", error);
    assert!(display.contains("matched nothing"));
    assert!(display.contains("div.content"));
}

#[test]
fn test_fetchError_fromExtractionError_shouldWrapTransparently() {
    let extraction = ExtractionError::EmptyContent("https://example.com".to_string());
    let fetch_error: FetchError = extraction.into();
    let display = format!("{}", fetch_error);
    assert!(display.contains("empty text"));
}

#[test]
fn test_engineError_apiError_shouldDisplayStatusAndMessage() {
    let error = EngineError::ApiError {
        status_code: 500,
        message: "model not loaded".to_string(),
    };
    let display = format!("{}", error);
    assert!(display.contains("500"));
    assert!(display.contains("model not loaded"));
}

#[test]
fn test_engineError_inputTooLong_shouldDisplayBothLengths() {
    let error = EngineError::InputTooLong {
        units: 900,
        max_units: 512,
    };
    let display = format!("{}", error);
    assert!(display.contains("900"));
    assert!(display.contains("512"));
}

#[test]
fn test_mergeError_noChapters_shouldDisplayCorrectly() {
    let display = format!("{}", MergeError::NoChapters);
    assert!(display.contains("no chapters to merge"));
}

#[test]
fn test_catalogError_notFound_shouldDisplayId() {
    let error = CatalogError::NotFound("abc-123".to_string());
    let display = format!("{}", error);
    assert!(display.contains("novel not found"));
    assert!(display.contains("abc-123"));
}

#[test]
fn test_appError_fromFetchError_shouldWrapCorrectly() {
    let fetch_error = FetchError::Unreachable("down".to_string());
    let app_error: AppError = fetch_error.into();
    let display = format!("{}", app_error);
    assert!(display.contains("Fetch error"));
}

#[test]
fn test_appError_fromEngineError_shouldWrapCorrectly() {
    let engine_error = EngineError::RequestFailed("timeout".to_string());
    let app_error: AppError = engine_error.into();
    let display = format!("{}", app_error);
    assert!(display.contains("Engine error"));
    assert!(display.contains("timeout"));
}

#[test]
fn test_appError_fromIoError_shouldWrapAsFileError() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
    let app_error: AppError = io_error.into();
    let display = format!("{}", app_error);
    assert!(display.contains("File error"));
    assert!(display.contains("File not found"));
}

#[test]
fn test_appError_fromAnyhowError_shouldWrapAsUnknown() {
    let anyhow_error = anyhow::anyhow!("something odd");
    let app_error: AppError = anyhow_error.into();
    let display = format!("{}", app_error);
    assert!(display.contains("Unknown error"));
    assert!(display.contains("something odd"));
}
