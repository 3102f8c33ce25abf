//! # Scanner State
//!
//! Camera acquisition, decoding loop and the add/update form filled from a
//! scan.
//!
//! ## Scan Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    One Scan                                             │
//! │                                                                         │
//! │  Scanner::scan(camera, items)                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CameraSession::start ── Camera::acquire() ──► lazy frame decoder      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  next_code(): pull frames                                              │
//! │       ├── Err(NoCode) ──► skip, pull next                              │
//! │       ├── Err(other) ───► return error                                 │
//! │       └── Ok(code) ─────► return code                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  session dropped ── Camera::release()   (on every path above)          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  match_barcode(code, items)                                            │
//! │       ├── Some(item) ──► ScanForm prefilled, submits as update         │
//! │       └── None ────────► ScanForm blank, submits as create             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use serde_json::json;
use stockroom_core::scan::match_barcode;
use stockroom_core::validation::{parse_item_patch, parse_new_item};
use stockroom_core::{Item, ItemPatch, NewItem, ValidationError, ValidationErrors};
use tracing::{debug, info, warn};

use crate::error::ScanError;

// =============================================================================
// Camera Abstraction
// =============================================================================

/// One decoded barcode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decoded {
    pub text: String,
    /// Symbology, e.g. `EAN_13`.
    pub format: Option<String>,
}

impl Decoded {
    pub fn new(text: impl Into<String>) -> Self {
        Decoded {
            text: text.into(),
            format: None,
        }
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }
}

/// A video device paired with a barcode decoder.
///
/// `acquire` opens the device and returns a lazy sequence of per-frame
/// decode results. The device stays open until `release` is called.
pub trait Camera {
    type Frames: Iterator<Item = Result<Decoded, ScanError>>;

    fn acquire(&mut self) -> Result<Self::Frames, ScanError>;

    fn release(&mut self);
}

/// An acquired camera. Dropping it releases the device.
pub struct CameraSession<'a, C: Camera> {
    camera: &'a mut C,
    frames: C::Frames,
}

impl<'a, C: Camera> CameraSession<'a, C> {
    pub fn start(camera: &'a mut C) -> Result<Self, ScanError> {
        let frames = camera.acquire()?;
        debug!("Camera acquired");
        Ok(CameraSession { camera, frames })
    }

    /// Pulls frames until one decodes. Frames without a code are skipped.
    pub fn next_code(&mut self) -> Result<Decoded, ScanError> {
        loop {
            match self.frames.next() {
                Some(Ok(decoded)) => return Ok(decoded),
                Some(Err(e)) if e.is_transient() => continue,
                Some(Err(e)) => return Err(e),
                None => return Err(ScanError::StreamEnded),
            }
        }
    }
}

impl<C: Camera> Drop for CameraSession<'_, C> {
    fn drop(&mut self) {
        self.camera.release();
        debug!("Camera released");
    }
}

/// Opens the camera, reads one code, and releases the camera.
pub fn scan_once<C: Camera>(camera: &mut C) -> Result<Decoded, ScanError> {
    let mut session = CameraSession::start(camera)?;
    session.next_code()
}

// =============================================================================
// Scan Form
// =============================================================================

/// What saving the form should do.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    /// `POST /items`
    Create(NewItem),
    /// `PUT /items/{id}`
    Update { id: i64, patch: ItemPatch },
}

/// The add/update form shown after a scan. Inputs are kept as typed text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanForm {
    pub name: String,
    pub category: String,
    pub stock: String,
    pub costprice: String,
    pub sellingprice: String,
    /// The scanned code; `None` until something was scanned.
    pub scanned: Option<Decoded>,
    /// Set when the scanned code matched a stored item.
    pub existing_id: Option<i64>,
}

impl ScanForm {
    /// Empty form for an unknown code.
    pub fn blank(scanned: Decoded) -> Self {
        ScanForm {
            scanned: Some(scanned),
            ..Default::default()
        }
    }

    /// Form prefilled from a stored item.
    ///
    /// An uncategorised item is shown under the report bucket name so the
    /// form can be saved without retyping it.
    pub fn for_item(item: &Item, scanned: Decoded) -> Self {
        ScanForm {
            name: item.name.clone(),
            category: item.category_or_misc().to_string(),
            stock: item.stock.to_string(),
            costprice: item.costprice.to_string(),
            sellingprice: item.sellingprice.to_string(),
            scanned: Some(scanned),
            existing_id: Some(item.id),
        }
    }

    pub fn is_update(&self) -> bool {
        self.existing_id.is_some()
    }

    /// Checks every field is filled, then validates the values.
    pub fn submission(&self) -> Result<Submission, ValidationErrors> {
        let mut missing = ValidationErrors::new();
        for (field, value) in [
            ("name", &self.name),
            ("category", &self.category),
            ("stock", &self.stock),
            ("costprice", &self.costprice),
            ("sellingprice", &self.sellingprice),
        ] {
            if value.trim().is_empty() {
                missing.push(ValidationError::Required {
                    field: field.to_string(),
                });
            }
        }

        let Some(scanned) = &self.scanned else {
            missing.push(ValidationError::Required {
                field: "barcode".to_string(),
            });
            return Err(missing);
        };

        if !missing.is_empty() {
            return Err(missing);
        }

        let mut body = json!({
            "name": self.name,
            "category": self.category,
            "stock": self.stock,
            "costprice": self.costprice,
            "sellingprice": self.sellingprice,
            "barcode": scanned.text,
        });
        if let Some(format) = &scanned.format {
            body["format"] = json!(format);
        }

        match self.existing_id {
            Some(id) => {
                let patch = parse_item_patch(&body)?;
                Ok(Submission::Update { id, patch })
            }
            None => Ok(Submission::Create(parse_new_item(&body)?)),
        }
    }
}

// =============================================================================
// Scanner
// =============================================================================

/// Scanner screen state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scanner {
    form: Option<ScanForm>,
    error: Option<ScanError>,
}

impl Scanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scans one code and opens the form for it.
    ///
    /// `items` is the list loaded by the last `GET /items`; matching does not
    /// hit the server. On a camera error the form is left as it was and the
    /// error is kept for display.
    pub fn scan<C: Camera>(&mut self, camera: &mut C, items: &[Item]) -> Result<&ScanForm, ScanError> {
        self.error = None;

        let decoded = match scan_once(camera) {
            Ok(decoded) => decoded,
            Err(e) => {
                warn!(error = %e, "Scan failed");
                self.error = Some(e.clone());
                return Err(e);
            }
        };

        let form = match match_barcode(&decoded.text, items) {
            Some(item) => {
                info!(barcode = %decoded.text, id = item.id, "Scanned known item");
                ScanForm::for_item(item, decoded)
            }
            None => {
                info!(barcode = %decoded.text, "Scanned new barcode");
                ScanForm::blank(decoded)
            }
        };

        Ok(self.form.insert(form))
    }

    pub fn form(&self) -> Option<&ScanForm> {
        self.form.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut ScanForm> {
        self.form.as_mut()
    }

    pub fn error(&self) -> Option<&ScanError> {
        self.error.as_ref()
    }

    /// Drops the form, e.g. after cancel or a successful save.
    pub fn reset(&mut self) {
        self.form = None;
        self.error = None;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use stockroom_core::{Money, MISC_CATEGORY};

    /// Camera that replays a fixed frame list and counts acquire/release.
    struct FakeCamera {
        frames: Vec<Result<Decoded, ScanError>>,
        fail_acquire: Option<ScanError>,
        acquired: usize,
        released: usize,
    }

    impl FakeCamera {
        fn new(frames: Vec<Result<Decoded, ScanError>>) -> Self {
            FakeCamera {
                frames,
                fail_acquire: None,
                acquired: 0,
                released: 0,
            }
        }

        fn is_open(&self) -> bool {
            self.acquired > self.released
        }
    }

    impl Camera for FakeCamera {
        type Frames = std::vec::IntoIter<Result<Decoded, ScanError>>;

        fn acquire(&mut self) -> Result<Self::Frames, ScanError> {
            if let Some(e) = self.fail_acquire.clone() {
                return Err(e);
            }
            self.acquired += 1;
            Ok(std::mem::take(&mut self.frames).into_iter())
        }

        fn release(&mut self) {
            self.released += 1;
        }
    }

    fn ball() -> Item {
        Item {
            id: 1,
            name: "Ball".to_string(),
            category: Some("Sports".to_string()),
            stock: 3,
            costprice: Money::from_major_minor(10, 0),
            sellingprice: Money::from_major_minor(15, 0),
            barcode: "123".to_string(),
            format: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_skips_empty_frames_and_releases() {
        let mut camera = FakeCamera::new(vec![
            Err(ScanError::NoCode),
            Err(ScanError::NoCode),
            Ok(Decoded::new("123")),
            Ok(Decoded::new("never read")),
        ]);

        let decoded = scan_once(&mut camera).unwrap();

        assert_eq!(decoded.text, "123");
        assert_eq!(camera.acquired, 1);
        assert!(!camera.is_open());
    }

    #[test]
    fn test_camera_error_releases() {
        let mut camera = FakeCamera::new(vec![
            Err(ScanError::NoCode),
            Err(ScanError::Unavailable("unplugged".to_string())),
        ]);

        let err = scan_once(&mut camera).unwrap_err();
        assert_eq!(err, ScanError::Unavailable("unplugged".to_string()));
        assert!(!camera.is_open());

        let mut empty = FakeCamera::new(vec![Err(ScanError::NoCode)]);
        assert_eq!(scan_once(&mut empty).unwrap_err(), ScanError::StreamEnded);
        assert!(!empty.is_open());
    }

    #[test]
    fn test_denied_permission_never_acquires() {
        let mut camera = FakeCamera::new(vec![]);
        camera.fail_acquire = Some(ScanError::PermissionDenied);

        let mut scanner = Scanner::new();
        let err = scanner.scan(&mut camera, &[]).unwrap_err();

        assert_eq!(err, ScanError::PermissionDenied);
        assert_eq!(scanner.error(), Some(&ScanError::PermissionDenied));
        assert!(scanner.form().is_none());
        assert_eq!(camera.released, 0);
    }

    #[test]
    fn test_known_barcode_prefills_update() {
        let items = vec![ball()];
        let mut camera = FakeCamera::new(vec![Ok(Decoded::new("123"))]);
        let mut scanner = Scanner::new();

        let form = scanner.scan(&mut camera, &items).unwrap();
        assert_eq!(form.existing_id, Some(1));
        assert_eq!(form.name, "Ball");
        assert_eq!(form.costprice, "10.00");

        scanner.form_mut().unwrap().stock = "10".to_string();
        match scanner.form().unwrap().submission().unwrap() {
            Submission::Update { id, patch } => {
                assert_eq!(id, 1);
                assert_eq!(patch.stock, Some(10));
                assert_eq!(patch.barcode.as_deref(), Some("123"));
            }
            other => panic!("expected update, got {:?}", other),
        }
    }

    #[test]
    fn test_uncategorised_item_can_be_resubmitted() {
        let mut item = ball();
        item.category = None;
        let items = vec![item];
        let mut camera = FakeCamera::new(vec![Ok(Decoded::new("123"))]);
        let mut scanner = Scanner::new();

        let form = scanner.scan(&mut camera, &items).unwrap();
        assert_eq!(form.category, MISC_CATEGORY);

        match form.submission().unwrap() {
            Submission::Update { patch, .. } => {
                assert_eq!(patch.category.as_deref(), Some(MISC_CATEGORY));
            }
            other => panic!("expected update, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_barcode_starts_blank() {
        let items = vec![ball()];
        let mut camera = FakeCamera::new(vec![Ok(Decoded::new("999").with_format("EAN_13"))]);
        let mut scanner = Scanner::new();

        let form = scanner.scan(&mut camera, &items).unwrap();
        assert!(!form.is_update());
        assert!(form.name.is_empty());
        assert!(form.stock.is_empty());

        let errors = form.submission().unwrap_err();
        assert_eq!(
            errors.fields(),
            vec!["name", "category", "stock", "costprice", "sellingprice"]
        );
    }

    #[test]
    fn test_filled_blank_form_creates() {
        let mut form = ScanForm::blank(Decoded::new("555").with_format("UPC_A"));
        form.name = "Bat".to_string();
        form.category = "Sports".to_string();
        form.stock = "4".to_string();
        form.costprice = "20".to_string();
        form.sellingprice = "35.5".to_string();

        match form.submission().unwrap() {
            Submission::Create(new) => {
                assert_eq!(new.barcode, "555");
                assert_eq!(new.format.as_deref(), Some("UPC_A"));
                assert_eq!(new.sellingprice.minor_units(), 3550);
            }
            other => panic!("expected create, got {:?}", other),
        }
    }

    #[test]
    fn test_form_without_scan_requires_barcode() {
        let form = ScanForm::default();
        let errors = form.submission().unwrap_err();
        assert_eq!(errors.fields().last(), Some(&"barcode"));
    }
}
