//! Type hierarchy arena.
//!
//! All described types are indexed by qualified name. Superclass links are
//! followed by lookup; a superclass missing from the arena ends the chain.

use std::collections::{HashMap, HashSet};

use crate::error::ExtractError;
use crate::model::{SourceModel, TypeDesc};

/// Described types keyed by qualified name.
pub struct TypeHierarchy<'a> {
    types: HashMap<&'a str, &'a TypeDesc>,
}

impl<'a> TypeHierarchy<'a> {
    /// Index every package and classpath type of a model.
    ///
    /// Package types shadow classpath types of the same name.
    pub fn new(model: &'a SourceModel) -> Self {
        let mut types = HashMap::new();
        for ty in &model.classpath {
            types.insert(ty.name.as_str(), ty);
        }
        for ty in model.packages.iter().flat_map(|p| &p.types) {
            types.insert(ty.name.as_str(), ty);
        }
        Self { types }
    }

    /// Look up a type by qualified name.
    pub fn get(&self, name: &str) -> Option<&'a TypeDesc> {
        self.types.get(name).copied()
    }

    /// The type followed by its superclasses, nearest first.
    pub fn superclass_chain(&self, ty: &'a TypeDesc) -> Result<Vec<&'a TypeDesc>, ExtractError> {
        let mut chain = vec![ty];
        let mut seen = HashSet::from([ty.name.as_str()]);
        let mut current = ty;
        while let Some(parent) = current.superclass.as_deref().and_then(|s| self.get(s)) {
            if !seen.insert(parent.name.as_str()) {
                return Err(ExtractError::CyclicHierarchy(ty.name.clone()));
            }
            chain.push(parent);
            current = parent;
        }
        Ok(chain)
    }

    /// Whether the type or any superclass directly implements `tag_interface`.
    pub fn is_tag(&self, ty: &'a TypeDesc, tag_interface: &str) -> Result<bool, ExtractError> {
        Ok(self
            .superclass_chain(ty)?
            .iter()
            .any(|t| t.interfaces.iter().any(|i| i == tag_interface)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PackageDesc, TypeKind};

    const TAG: &str = "org.apache.commons.jelly.Tag";

    fn class(name: &str, superclass: Option<&str>, interfaces: &[&str]) -> TypeDesc {
        TypeDesc {
            name: name.to_owned(),
            superclass: superclass.map(str::to_owned),
            interfaces: interfaces.iter().map(|i| (*i).to_owned()).collect(),
            ..Default::default()
        }
    }

    fn model(types: Vec<TypeDesc>, classpath: Vec<TypeDesc>) -> SourceModel {
        SourceModel {
            packages: vec![PackageDesc {
                name: "p".to_owned(),
                types,
                ..Default::default()
            }],
            classpath,
        }
    }

    #[test]
    fn test_direct_implementation() {
        let model = model(vec![class("p.ATag", None, &[TAG])], vec![]);
        let hierarchy = TypeHierarchy::new(&model);
        let ty = hierarchy.get("p.ATag").unwrap();
        assert!(hierarchy.is_tag(ty, TAG).unwrap());
    }

    #[test]
    fn test_inherited_through_classpath() {
        let model = model(
            vec![class("p.ATag", Some("p.BaseTag"), &[])],
            vec![
                class("p.BaseTag", Some("jelly.TagSupport"), &[]),
                class("jelly.TagSupport", None, &[TAG]),
            ],
        );
        let hierarchy = TypeHierarchy::new(&model);
        let ty = hierarchy.get("p.ATag").unwrap();
        assert!(hierarchy.is_tag(ty, TAG).unwrap());

        let chain: Vec<&str> = hierarchy
            .superclass_chain(ty)
            .unwrap()
            .iter()
            .map(|t| t.name.as_str())
            .collect();
        assert_eq!(chain, ["p.ATag", "p.BaseTag", "jelly.TagSupport"]);
    }

    #[test]
    fn test_unknown_superclass_ends_chain() {
        let model = model(vec![class("p.A", Some("java.lang.Object"), &[])], vec![]);
        let hierarchy = TypeHierarchy::new(&model);
        let ty = hierarchy.get("p.A").unwrap();
        assert_eq!(hierarchy.superclass_chain(ty).unwrap().len(), 1);
        assert!(!hierarchy.is_tag(ty, TAG).unwrap());
    }

    #[test]
    fn test_cycle_detected() {
        let model = model(
            vec![class("p.A", Some("p.B"), &[]), class("p.B", Some("p.A"), &[])],
            vec![],
        );
        let hierarchy = TypeHierarchy::new(&model);
        let ty = hierarchy.get("p.A").unwrap();
        let err = hierarchy.is_tag(ty, TAG).unwrap_err();
        assert!(matches!(err, ExtractError::CyclicHierarchy(name) if name == "p.A"));
    }

    #[test]
    fn test_package_type_shadows_classpath() {
        let mut shadowed = class("p.A", None, &[]);
        shadowed.kind = TypeKind::Interface;
        let model = model(vec![class("p.A", None, &[TAG])], vec![shadowed]);
        let hierarchy = TypeHierarchy::new(&model);
        assert_eq!(hierarchy.get("p.A").unwrap().kind, TypeKind::Class);
    }
}
