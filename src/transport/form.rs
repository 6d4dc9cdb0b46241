//! Multipart form bodies.

/// Value of a single form field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormValue {
    Text(String),
    File {
        file_name: Option<String>,
        mime: Option<String>,
        bytes: Vec<u8>,
    },
}

/// A named form field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormPart {
    pub name: String,
    pub value: FormValue,
}

/// Ordered set of form fields, sent as `multipart/form-data`.
///
/// The transport generates the boundary and the matching `Content-Type`
/// header, which is why the client never derives one for multipart bodies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    parts: Vec<FormPart>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a text field
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push(FormPart {
            name: name.into(),
            value: FormValue::Text(value.into()),
        });
        self
    }

    /// Append a file field
    pub fn file(
        mut self,
        name: impl Into<String>,
        file_name: impl Into<String>,
        mime: Option<&str>,
        bytes: Vec<u8>,
    ) -> Self {
        self.parts.push(FormPart {
            name: name.into(),
            value: FormValue::File {
                file_name: Some(file_name.into()),
                mime: mime.map(str::to_string),
                bytes,
            },
        });
        self
    }

    pub fn parts(&self) -> &[FormPart] {
        &self.parts
    }

    pub fn into_parts(self) -> Vec<FormPart> {
        self.parts
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Text fields as name/value pairs, or the name of the first file field
    pub(crate) fn text_pairs(&self) -> Result<Vec<(&str, &str)>, &str> {
        self.parts
            .iter()
            .map(|part| match &part.value {
                FormValue::Text(value) => Ok((part.name.as_str(), value.as_str())),
                FormValue::File { .. } => Err(part.name.as_str()),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_keeps_order() {
        let form = FormData::new()
            .text("a", "1")
            .file("upload", "notes.txt", Some("text/plain"), b"hi".to_vec())
            .text("b", "2");

        let names: Vec<_> = form.parts().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["a", "upload", "b"]);
    }

    #[test]
    fn test_text_pairs_rejects_files() {
        let text_only = FormData::new().text("a", "1").text("b", "2");
        assert_eq!(text_only.text_pairs().unwrap(), vec![("a", "1"), ("b", "2")]);

        let with_file = FormData::new().text("a", "1").file("f", "x.bin", None, vec![0]);
        assert_eq!(with_file.text_pairs().unwrap_err(), "f");
    }
}
