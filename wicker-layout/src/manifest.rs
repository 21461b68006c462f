use serde::{Deserialize, Serialize};
use wicker_error::WickerResult;
use wicker_expr::{ExprForm, ExprRef};
use wicker_view::ViewRegistry;

use crate::{RecordLayout, SourceLocation};

/// The portable form of a [`RecordLayout`]: exactly the ordered key-expression
/// list plus the optional target type, with optional declaration metadata.
///
/// The slot tables are derived, not stored — reconstruction re-runs
/// [`RecordLayout::create`] over the key list, which re-derives them
/// deterministically, then re-attaches the target type through the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutManifest {
    keys: Vec<ExprForm>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    target_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    origin: Option<SourceLocation>,
}

impl LayoutManifest {
    /// The serialized key expressions, direct partition first.
    pub fn keys(&self) -> &[ExprForm] {
        &self.keys
    }

    /// The target type name, if one was attached.
    pub fn target_type(&self) -> Option<&str> {
        self.target_type.as_deref()
    }

    /// The declaration site, if recorded.
    pub fn origin(&self) -> Option<&SourceLocation> {
        self.origin.as_ref()
    }

    /// Record the declaration site this layout came from.
    pub fn with_origin(mut self, origin: SourceLocation) -> Self {
        self.origin = Some(origin);
        self
    }
}

impl RecordLayout {
    /// Capture this layout's portable form.
    pub fn to_manifest(&self) -> WickerResult<LayoutManifest> {
        let keys = self
            .key_expressions()
            .iter()
            .map(ExprForm::try_from)
            .collect::<WickerResult<Vec<_>>>()?;
        Ok(LayoutManifest {
            keys,
            target_type: self.target_type().map(|ty| ty.name().to_string()),
            origin: None,
        })
    }

    /// Reconstruct a layout from its portable form.
    ///
    /// The registry is consulted only when the manifest names a target type;
    /// an unknown name fails with `UnsupportedCapability` rather than
    /// silently dropping the annotation.
    pub fn from_manifest(
        manifest: &LayoutManifest,
        registry: &ViewRegistry,
    ) -> WickerResult<Self> {
        let mut layout = Self::create(manifest.keys.iter().map(ExprRef::from));
        if let Some(name) = manifest.target_type() {
            layout.set_target_type(registry, name)?;
        }
        Ok(layout)
    }
}

#[cfg(test)]
mod tests {
    use wicker_expr::{ArrayAccess, element_count, field, whole};
    use wicker_view::typed_view;

    use super::*;

    typed_view! {
        struct ShipmentView {
            carrier: text,
        }
    }

    fn sample_layout() -> RecordLayout {
        RecordLayout::create([
            whole(),
            field("fieldA"),
            ArrayAccess::index(0, field("fieldB")),
            ArrayAccess::index(1, field("fieldB")),
            element_count(field("fieldB")),
        ])
    }

    #[test]
    fn manifest_roundtrip_preserves_schema_identity() {
        let layout = sample_layout();
        let manifest = layout.to_manifest().unwrap();
        let rebuilt = RecordLayout::from_manifest(&manifest, &ViewRegistry::new()).unwrap();
        assert_eq!(layout, rebuilt);
        for key in layout.key_expressions() {
            assert_eq!(
                layout.slot_of(&key).unwrap(),
                rebuilt.slot_of(&key).unwrap()
            );
        }
    }

    #[test]
    fn manifest_roundtrip_preserves_target_type() {
        let mut registry = ViewRegistry::new();
        registry.register::<ShipmentView>();
        let layout = sample_layout()
            .with_target_type(&registry, "ShipmentView")
            .unwrap();

        let json = serde_json::to_string(&layout.to_manifest().unwrap()).unwrap();
        let manifest: LayoutManifest = serde_json::from_str(&json).unwrap();
        let rebuilt = RecordLayout::from_manifest(&manifest, &registry).unwrap();

        assert_eq!(layout, rebuilt);
        assert_eq!(rebuilt.target_type().unwrap().name(), "ShipmentView");
    }

    #[test]
    fn unknown_target_type_fails_reconstruction() {
        let mut registry = ViewRegistry::new();
        registry.register::<ShipmentView>();
        let layout = sample_layout()
            .with_target_type(&registry, "ShipmentView")
            .unwrap();
        let manifest = layout.to_manifest().unwrap();

        let err = RecordLayout::from_manifest(&manifest, &ViewRegistry::new()).unwrap_err();
        assert!(matches!(
            err,
            wicker_error::WickerError::UnsupportedCapability { .. }
        ));
    }

    #[test]
    fn manifest_carries_the_declaration_site() {
        let manifest = sample_layout()
            .to_manifest()
            .unwrap()
            .with_origin(SourceLocation::new("orders", "build_plan", "plan.rs", 12));
        let json = serde_json::to_string(&manifest).unwrap();
        let read_back: LayoutManifest = serde_json::from_str(&json).unwrap();
        assert_eq!(read_back.origin().unwrap().line(), 12);
        assert_eq!(manifest, read_back);
    }

    #[test]
    fn untargeted_manifest_omits_the_annotation() {
        let manifest = sample_layout().to_manifest().unwrap();
        assert_eq!(manifest.target_type(), None);
        let json = serde_json::to_string(&manifest).unwrap();
        assert!(!json.contains("target_type"));
    }
}
