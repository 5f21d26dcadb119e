// Endpoint path builders.
//
// All paths are relative to the cloud base URL. Two endpoint families are
// used by the core crate: the integrations surface (device actions, keyed by
// device uuid) and the automations surface (keyed by automation id).

/// Device action endpoint on the integrations surface.
pub fn integration_device(uuid: &str) -> String {
    format!("integrations/v1/devices/{uuid}")
}

/// A single automation.
pub fn automation(id: &str) -> String {
    format!("api/v1/automations/{id}")
}

/// Trigger endpoint for an automation.
pub fn automation_apply(id: &str) -> String {
    format!("api/v1/automations/{id}/apply")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integration_path_embeds_uuid() {
        assert_eq!(
            integration_device("f3a1"),
            "integrations/v1/devices/f3a1"
        );
    }

    #[test]
    fn automation_apply_path() {
        assert_eq!(automation_apply("17"), "api/v1/automations/17/apply");
    }
}
