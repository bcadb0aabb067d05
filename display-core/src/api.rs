//! Wire model of the device's `/api/v1` REST surface.

use serde::Deserialize;

pub const UPLOAD_OTA: &str = "/api/v1/upload_ota";
pub const UPLOAD_ANIMATION: &str = "/api/v1/upload_animation";
pub const REBOOT: &str = "/api/v1/reboot";
pub const ACTIVATE_BOOTED_PARTITION: &str = "/api/v1/activate_booted_partition";
pub const ACTIVATE_STANDBY_PARTITION: &str = "/api/v1/activate_standby_partition";
pub const ANIMATIONS: &str = "/api/v1/animations";
pub const SET_ANIMATION: &str = "/api/v1/set_animation";
pub const DELETE_ANIMATION: &str = "/api/v1/delete_animation";
pub const SET_ENABLE_LEDS: &str = "/api/v1/set_enable_leds";
pub const SET_LED_UPDATE_DISABLE: &str = "/api/v1/set_led_update_disable";

/// One stored animation as reported by `GET /api/v1/animations`.
/// The device only includes `active` on the entry currently playing.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Animation {
    pub name: String,
    #[serde(default)]
    pub active: bool,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct AnimationList {
    #[serde(default)]
    pub animations: Vec<Animation>,
}

/// One of the two firmware slots on the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Partition {
    Booted,
    Standby,
}

impl Partition {
    pub fn activate_path(&self) -> &'static str {
        match self {
            Partition::Booted => ACTIVATE_BOOTED_PARTITION,
            Partition::Standby => ACTIVATE_STANDBY_PARTITION,
        }
    }
}

/// Query value for the LED switch endpoints (`enable=`, `disable=`).
pub fn switch_flag(on: bool) -> &'static str {
    if on {
        "1"
    } else {
        "0"
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Extract the `error` field from a JSON failure body.
///
/// Malformed or absent JSON means no message is available; the failure is
/// still reported, just without explanatory text.
pub fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_animation_list_decoding() {
        let json = r#"{ "animations": [{ "name": "nyan.gif", "active": true }, { "name": "rain.gif" }] }"#;
        let list: AnimationList = serde_json::from_str(json).unwrap();
        assert_eq!(
            list.animations,
            vec![
                Animation { name: "nyan.gif".into(), active: true },
                Animation { name: "rain.gif".into(), active: false },
            ]
        );
    }

    #[test]
    fn test_empty_animation_list() {
        let list: AnimationList = serde_json::from_str(r#"{ "animations": [] }"#).unwrap();
        assert!(list.animations.is_empty());
    }

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(
            error_message(r#"{ "error": "bad image" }"#),
            Some("bad image".to_string())
        );
        assert_eq!(error_message("{}"), None);
        assert_eq!(error_message("not json at all"), None);
    }

    #[test]
    fn test_partition_paths() {
        assert_eq!(Partition::Booted.activate_path(), ACTIVATE_BOOTED_PARTITION);
        assert_eq!(Partition::Standby.activate_path(), ACTIVATE_STANDBY_PARTITION);
    }

    #[test]
    fn test_switch_flags() {
        assert_eq!(switch_flag(true), "1");
        assert_eq!(switch_flag(false), "0");
    }
}
