//! A `PdfParser` whose single response is scripted ahead of time.

use std::sync::Mutex;

use covenant_core::errors::CovenantResult;
use covenant_core::traits::pdf_parser::{ParsedDocument, PdfParser};

pub struct ScriptedPdfParser {
    result: Mutex<Option<CovenantResult<ParsedDocument>>>,
}

impl ScriptedPdfParser {
    pub fn ok(document: ParsedDocument) -> Self {
        Self { result: Mutex::new(Some(Ok(document))) }
    }

    pub fn err(error: covenant_core::errors::CovenantError) -> Self {
        Self { result: Mutex::new(Some(Err(error))) }
    }
}

impl PdfParser for ScriptedPdfParser {
    async fn parse(&self, _bytes: &[u8], _filename: &str) -> CovenantResult<ParsedDocument> {
        self.result
            .lock()
            .expect("scripted parser mutex poisoned")
            .take()
            .expect("ScriptedPdfParser called more than once")
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use covenant_core::traits::pdf_parser::ParsedMetadata;

    use super::*;

    #[tokio::test]
    async fn ok_returns_the_scripted_document_exactly_once() {
        let document = ParsedDocument {
            raw_text: "body".to_string(),
            sections: BTreeMap::new(),
            tables: vec![],
            metadata: ParsedMetadata::default(),
        };
        let parser = ScriptedPdfParser::ok(document);
        let parsed = parser.parse(b"bytes", "file.pdf").await.unwrap();
        assert_eq!(parsed.raw_text, "body");
    }

    #[tokio::test]
    #[should_panic(expected = "called more than once")]
    async fn calling_twice_panics() {
        let document = ParsedDocument::default();
        let parser = ScriptedPdfParser::ok(document);
        parser.parse(b"bytes", "file.pdf").await.unwrap();
        let _ = parser.parse(b"bytes", "file.pdf").await;
    }

    #[tokio::test]
    async fn err_surfaces_the_scripted_failure() {
        let parser = ScriptedPdfParser::err(covenant_core::errors::CovenantError::Transient("corrupt stream".to_string()));
        let err = parser.parse(b"bytes", "file.pdf").await.unwrap_err();
        assert!(matches!(err, covenant_core::errors::CovenantError::Transient(_)));
    }
}
