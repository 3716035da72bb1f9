pub mod file;
pub mod samples;
#[cfg(feature = "network")]
pub mod scrape;
#[cfg(feature = "network")]
pub mod wikipedia;

/// Plain text handed to the pipeline, with an optional display title. Every
/// producer is independent; none shares state with tokenization.
#[derive(Clone, Debug)]
pub struct SourceText {
    pub title: Option<String>,
    pub body: String,
}

impl SourceText {
    pub fn untitled(body: String) -> Self {
        Self { title: None, body }
    }

    pub fn titled(title: &str, body: String) -> Self {
        Self {
            title: Some(title.to_string()),
            body,
        }
    }
}
