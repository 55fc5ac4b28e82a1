use serde_json::{Value, json};

/// A file the Space has accepted into its temporary storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub path: String,
    pub orig_name: String,
    pub mime_type: String,
    pub size: u64,
}

impl UploadedFile {
    /// File reference as the first positional argument of a call.
    pub fn as_payload(&self) -> Value {
        json!({
            "path": self.path,
            "orig_name": self.orig_name,
            "mime_type": self.mime_type,
            "size": self.size,
            "meta": { "_type": "gradio.FileData" },
        })
    }
}
