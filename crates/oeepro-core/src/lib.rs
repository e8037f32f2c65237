//! OEE PRO Core - client-side logic for the manufacturing dashboard
//!
//! This crate provides the pieces of the OEE PRO front end that are worth
//! computing in Rust: the circular photo cropper used during registration,
//! OEE and Pareto metrics, role-based permissions, cascading form fields,
//! approval polling and the backend response envelope.
//!
//! Nothing here performs I/O. The host reads files, sends requests and runs
//! timers, then feeds the results in.

pub mod api;
pub mod auth;
pub mod cropper;
pub mod decode;
pub mod encode;
pub mod form;
pub mod mask;
pub mod oee;
pub mod poll;
pub mod role;
pub mod transform;

pub use api::{ApiError, ApiResponse, ApiStatus, RegistrationRequest};
pub use auth::{AccountStatus, AppState, User};
pub use cropper::{CommittedPhoto, CropError, Cropper, CropperConfig};
pub use decode::{DecodeError, DecodedImage};
pub use form::{FormEngine, FormError, MasterData};
pub use oee::{compute_oee, pareto, OeeInputs, OeeReport, ParetoEntry};
pub use poll::{PollState, PollTask};
pub use role::{Permission, Role, RoleError};
pub use transform::{InterpolationFilter, TransformState};

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = ImageBuffer::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        });
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_registration_with_cropped_photo() {
        let mut cropper = Cropper::default();
        cropper.open(&png_bytes(320, 240)).unwrap();
        cropper.begin_drag(100.0, 100.0);
        cropper.continue_drag(110.0, 95.0);
        cropper.end_drag();
        cropper.set_zoom(1.5);

        let photo = cropper.commit().unwrap();
        assert!(!cropper.has_session());

        let request = RegistrationRequest {
            username: "op1".into(),
            password: "pw".into(),
            name: "Operator One".into(),
            job_title: Some("Line Operator".into()),
            zone: None,
            photo: photo.data_uri,
        };
        let json = request.to_json().unwrap();
        assert!(json.contains("data:image/jpeg;base64,"));
    }

    #[test]
    fn test_login_from_envelope() {
        let body = r#"{
            "status": "success",
            "data": {"username": "a1", "name": "Admin", "role": "ADMIN", "status": "approved"}
        }"#;
        let user: User = api::parse_response(body).unwrap();

        let mut state = AppState::new();
        state.login(user);
        assert!(state.can(Permission::ApproveUsers));
    }
}
