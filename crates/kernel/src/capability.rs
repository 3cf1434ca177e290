//! Declared component requirements.
//!
//! The table is filled explicitly at startup (`require::<T, R>()`), and
//! attaching a `T` walks it to default-construct whatever the node lacks.

use std::collections::{BTreeMap, BTreeSet};

use crate::component::{Component, ComponentTag};

/// Errors raised while resolving requirements.
#[derive(Debug, thiserror::Error)]
pub enum CapabilityError {
    #[error("component requirement cycle: {chain}")]
    Cycle { chain: String },
}

/// One required component type and how to build a default instance of it.
#[derive(Clone, Copy)]
pub struct Requirement {
    tag: ComponentTag,
    construct: fn() -> Box<dyn Component>,
}

impl Requirement {
    pub fn tag(&self) -> ComponentTag {
        self.tag
    }

    /// A fresh default instance of the required type.
    pub fn construct(&self) -> Box<dyn Component> {
        (self.construct)()
    }
}

impl std::fmt::Debug for Requirement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Requirement").field(&self.tag.name()).finish()
    }
}

fn construct_default<R: Component + Default>() -> Box<dyn Component> {
    Box::new(R::default())
}

/// Maps each component type to the ordered list of types it requires.
#[derive(Debug, Clone, Default)]
pub struct CapabilityRegistry {
    table: BTreeMap<ComponentTag, Vec<Requirement>>,
}

impl CapabilityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare that `T` requires `R`. Declaring the same pair twice is a no-op.
    pub fn require<T: Component, R: Component + Default>(&mut self) -> &mut Self {
        let required = ComponentTag::of::<R>();
        let list = self.table.entry(ComponentTag::of::<T>()).or_default();
        if !list.iter().any(|r| r.tag == required) {
            list.push(Requirement {
                tag: required,
                construct: construct_default::<R>,
            });
        }
        self
    }

    /// Direct requirements of `tag`, in declaration order.
    pub fn requirements(&self, tag: ComponentTag) -> &[Requirement] {
        self.table.get(&tag).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of component types with at least one declared requirement.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Check every declared type for cycles.
    pub fn validate(&self) -> Result<(), CapabilityError> {
        for tag in self.table.keys() {
            self.check(*tag)?;
        }
        Ok(())
    }

    /// Check the requirement graph reachable from `tag` for cycles,
    /// independent of what any node currently holds.
    pub fn check(&self, tag: ComponentTag) -> Result<(), CapabilityError> {
        let mut path = vec![tag];
        let mut done = BTreeSet::new();
        self.walk(&mut path, &mut done)
    }

    /// Plan the requirements to auto-attach before attaching `tag`.
    ///
    /// Dependencies come before dependents and each type appears at most
    /// once. Types for which `present` returns true are skipped along with
    /// their own requirements.
    pub fn resolve(
        &self,
        tag: ComponentTag,
        present: impl Fn(ComponentTag) -> bool,
    ) -> Result<Vec<Requirement>, CapabilityError> {
        self.check(tag)?;
        let mut planned = BTreeSet::new();
        let mut plan = Vec::new();
        self.plan(tag, &present, &mut planned, &mut plan);
        Ok(plan)
    }

    fn walk(
        &self,
        path: &mut Vec<ComponentTag>,
        done: &mut BTreeSet<ComponentTag>,
    ) -> Result<(), CapabilityError> {
        let Some(&tag) = path.last() else {
            return Ok(());
        };
        for requirement in self.requirements(tag) {
            let next = requirement.tag;
            if let Some(start) = path.iter().position(|t| *t == next) {
                let chain = path[start..]
                    .iter()
                    .chain(std::iter::once(&next))
                    .map(ComponentTag::short_name)
                    .collect::<Vec<_>>()
                    .join(" -> ");
                return Err(CapabilityError::Cycle { chain });
            }
            if done.contains(&next) {
                continue;
            }
            path.push(next);
            self.walk(path, done)?;
            path.pop();
            done.insert(next);
        }
        Ok(())
    }

    fn plan(
        &self,
        tag: ComponentTag,
        present: &dyn Fn(ComponentTag) -> bool,
        planned: &mut BTreeSet<ComponentTag>,
        plan: &mut Vec<Requirement>,
    ) {
        for requirement in self.requirements(tag) {
            if present(requirement.tag) || !planned.insert(requirement.tag) {
                continue;
            }
            self.plan(requirement.tag, present, planned, plan);
            plan.push(*requirement);
        }
    }
}
