//! Object metadata helpers shared by the resource modules

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

use super::types::Labels;

/// Metadata for a new namespaced object
pub fn new_meta(
    namespace: &str,
    name: &str,
    labels: Option<&Labels>,
    annotations: Option<&Labels>,
) -> ObjectMeta {
    ObjectMeta {
        name: Some(name.to_string()),
        namespace: Some(namespace.to_string()),
        labels: labels.filter(|l| !l.is_empty()).cloned(),
        annotations: annotations.filter(|a| !a.is_empty()).cloned(),
        ..Default::default()
    }
}

/// Overlay request labels/annotations; `None` leaves the current value
pub fn overlay_meta(meta: &mut ObjectMeta, labels: Option<&Labels>, annotations: Option<&Labels>) {
    if let Some(labels) = labels {
        meta.labels = Some(labels.clone());
    }
    if let Some(annotations) = annotations {
        meta.annotations = Some(annotations.clone());
    }
}

/// Decide how the merged object is written back
///
/// Without a version the write is unconditional. With one, the control
/// plane compares it against the stored object and rejects a stale write
/// with Conflict.
pub fn set_write_precondition(meta: &mut ObjectMeta, resource_version: Option<&str>) {
    meta.resource_version = resource_version
        .filter(|v| !v.is_empty())
        .map(str::to_string);
}

pub fn creation_time(meta: &ObjectMeta) -> Option<String> {
    meta.creation_timestamp.as_ref().map(|t| t.0.to_rfc3339())
}

pub fn labels(meta: &ObjectMeta) -> Labels {
    meta.labels.clone().unwrap_or_default()
}

pub fn annotations(meta: &ObjectMeta) -> Labels {
    meta.annotations.clone().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_meta_drops_empty_maps() {
        let meta = new_meta("default", "web", Some(&Labels::new()), None);
        assert_eq!(meta.name.as_deref(), Some("web"));
        assert!(meta.labels.is_none());
        assert!(meta.annotations.is_none());
    }

    #[test]
    fn test_precondition_cleared_by_default() {
        let mut meta = ObjectMeta {
            resource_version: Some("41".to_string()),
            ..Default::default()
        };
        set_write_precondition(&mut meta, None);
        assert!(meta.resource_version.is_none());

        set_write_precondition(&mut meta, Some("7"));
        assert_eq!(meta.resource_version.as_deref(), Some("7"));
    }

    #[test]
    fn test_overlay_keeps_absent_fields() {
        let mut meta = new_meta(
            "default",
            "web",
            Some(&Labels::from([("app".to_string(), "web".to_string())])),
            None,
        );
        overlay_meta(&mut meta, None, Some(&Labels::from([("a".to_string(), "b".to_string())])));
        assert_eq!(labels(&meta).get("app").map(String::as_str), Some("web"));
        assert_eq!(annotations(&meta).len(), 1);
    }
}
