use crate::prelude::{Anchor, AnchorId, AnchorPosition, Error};

#[cfg(feature = "serde")]
use serde::Deserialize;

/// Static [AnchorRegistry], mapping each [AnchorId] to its fixed [AnchorPosition].
/// Entries are kept in registration order. The registry is defined at startup
/// and never mutated afterwards: there is no dynamic anchor discovery.
#[derive(Default, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct AnchorRegistry {
    anchors: Vec<Anchor>,
}

impl AnchorRegistry {
    /// Builds an empty [AnchorRegistry]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reference deployment: three anchors surrounding the test area.
    pub fn reference() -> Self {
        Self::new()
            .with_anchor(AnchorId::from(0x8817), AnchorPosition::new(4.0, -4.5))
            .with_anchor(AnchorId::from(0x8717), AnchorPosition::new(0.0, 0.0))
            .with_anchor(AnchorId::from(0x8617), AnchorPosition::new(4.5, 6.5))
    }

    /// Copies and returns [AnchorRegistry] with one more [Anchor]
    pub fn with_anchor(&self, id: AnchorId, position: AnchorPosition) -> Self {
        let mut s = self.clone();
        s.anchors.push(Anchor { id, position });
        s
    }

    /// Returns [AnchorPosition] for this [AnchorId], if known
    pub fn position(&self, id: &AnchorId) -> Option<AnchorPosition> {
        self.anchors
            .iter()
            .find(|anchor| anchor.id == *id)
            .map(|anchor| anchor.position)
    }

    /// True if this [AnchorId] is registered
    pub fn contains(&self, id: &AnchorId) -> bool {
        self.position(id).is_some()
    }

    /// Number of registered anchors
    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    /// Iterates registered [Anchor]s in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Anchor> + '_ {
        self.anchors.iter()
    }

    pub(crate) fn validate(&self) -> Result<(), Error> {
        for (index, anchor) in self.anchors.iter().enumerate() {
            if !anchor.position.is_finite() {
                return Err(Error::NonFiniteInput);
            }
            if self.anchors[..index].iter().any(|a| a.id == anchor.id) {
                return Err(Error::DuplicateAnchor(anchor.id.clone()));
            }
        }
        Ok(())
    }
}

impl FromIterator<(AnchorId, AnchorPosition)> for AnchorRegistry {
    fn from_iter<I: IntoIterator<Item = (AnchorId, AnchorPosition)>>(iter: I) -> Self {
        Self {
            anchors: iter
                .into_iter()
                .map(|(id, position)| Anchor { id, position })
                .collect(),
        }
    }
}
