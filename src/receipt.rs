use crate::api::ApiError;

const DEFAULT_DESCRIPTION: &str = "Receipt items";

/// Form state for the receipt scanner. The selected file itself lives
/// with the component (it is a browser handle); this tracks everything
/// around it.
#[derive(Clone, PartialEq, Debug)]
pub struct ReceiptForm {
    pub description: String,
    busy: bool,
    error: Option<String>,
    notice: Option<String>,
}

impl Default for ReceiptForm {
    fn default() -> Self {
        Self {
            description: DEFAULT_DESCRIPTION.to_string(),
            busy: false,
            error: None,
            notice: None,
        }
    }
}

impl ReceiptForm {
    pub fn busy(&self) -> bool {
        self.busy
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn set_description(&mut self, text: String) {
        self.description = text;
    }

    /// A non-image selection is refused before it ever gets near the
    /// upload.
    pub fn reject_file(&mut self) {
        self.error = Some("Please select a valid image file (JPG, PNG, etc.)".to_string());
    }

    pub fn accept_file(&mut self) {
        self.error = None;
    }

    /// Local gate for the upload: without a file this fails immediately
    /// and no request may be made; while busy, resubmission is refused.
    pub fn begin(&mut self, has_file: bool) -> bool {
        if self.busy {
            return false;
        }
        if !has_file {
            self.error = Some("Please select a receipt image first".to_string());
            return false;
        }
        self.busy = true;
        self.error = None;
        self.notice = None;
        true
    }

    /// Success resets the form for the next receipt and tells the
    /// caller to drop the file and refresh the ledger; failure keeps
    /// the description (and the caller keeps the file) for a retry.
    pub fn finish(&mut self, outcome: Result<u64, ApiError>) -> bool {
        self.busy = false;
        match outcome {
            Ok(added) => {
                self.notice = Some(format!(
                    "Successfully processed receipt! Added {added} expenses."
                ));
                self.description = DEFAULT_DESCRIPTION.to_string();
                self.error = None;
                true
            }
            Err(error) => {
                self.error = Some(error.to_string());
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ReceiptForm;
    use crate::api::ApiError;

    #[test]
    fn upload_without_a_file_is_refused_locally() {
        let mut form = ReceiptForm::default();

        assert!(!form.begin(false));
        assert!(!form.busy());
        assert_eq!(form.error(), Some("Please select a receipt image first"));
    }

    #[test]
    fn successful_upload_resets_the_form() {
        let mut form = ReceiptForm::default();
        form.set_description("Grocery run".to_string());

        assert!(form.begin(true));
        assert!(form.busy());

        assert!(form.finish(Ok(4)));
        assert!(!form.busy());
        assert_eq!(
            form.notice(),
            Some("Successfully processed receipt! Added 4 expenses.")
        );
        assert_eq!(form.description, "Receipt items");
    }

    #[test]
    fn failed_upload_keeps_the_description_for_retry() {
        let mut form = ReceiptForm::default();
        form.set_description("Restaurant bill".to_string());
        form.begin(true);

        assert!(!form.finish(Err(ApiError::Server("File must be an image".to_string()))));
        assert_eq!(form.error(), Some("File must be an image"));
        assert_eq!(form.description, "Restaurant bill");
        assert_eq!(form.notice(), None);
    }

    #[test]
    fn resubmission_is_gated_while_busy() {
        let mut form = ReceiptForm::default();
        assert!(form.begin(true));
        assert!(!form.begin(true));
    }

    #[test]
    fn non_image_selection_is_rejected() {
        let mut form = ReceiptForm::default();
        form.reject_file();
        assert_eq!(
            form.error(),
            Some("Please select a valid image file (JPG, PNG, etc.)")
        );

        form.accept_file();
        assert_eq!(form.error(), None);
    }
}
