//! Lookup table of modes and determinations.

use serde::{Deserialize, Serialize};

use super::{Determination, Mode, ModeKind};
use crate::error::{IlpError, Result};
use crate::syntax::Signature;

/// Modes and determinations of a program.
///
/// Several modes may share a signature (`parent(+,-)` and `parent(-,+)`);
/// a determination naming that signature admits all of them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeCollection {
    modes: Vec<Mode>,
    determinations: Vec<Determination>,
}

impl ModeCollection {
    pub fn new() -> Self {
        ModeCollection::default()
    }

    /// Add a mode. Returns `false` if an identical mode is present.
    pub fn add_mode(&mut self, mode: Mode) -> bool {
        if self.modes.contains(&mode) {
            return false;
        }
        self.modes.push(mode);
        true
    }

    /// Add a determination, merging with an existing one for the same head.
    ///
    /// Every signature must already have a matching mode.
    pub fn add_determination(&mut self, determination: Determination) -> Result<()> {
        self.require(ModeKind::Head, &determination.head)?;
        for sig in &determination.body {
            self.require(ModeKind::Body, sig)?;
        }
        match self
            .determinations
            .iter_mut()
            .find(|d| d.head == determination.head)
        {
            Some(existing) => {
                for sig in determination.body {
                    if !existing.body.contains(&sig) {
                        existing.body.push(sig);
                    }
                }
            }
            None => self.determinations.push(determination),
        }
        Ok(())
    }

    fn require(&self, kind: ModeKind, sig: &Signature) -> Result<()> {
        if self.modes.iter().any(|m| m.kind == kind && &m.signature() == sig) {
            Ok(())
        } else {
            Err(IlpError::UnknownMode {
                kind: kind.keyword(),
                signature: sig.clone(),
            })
        }
    }

    /// Remove a mode. Absent modes are ignored.
    pub fn remove_mode(&mut self, mode: &Mode) -> bool {
        let before = self.modes.len();
        self.modes.retain(|m| m != mode);
        self.modes.len() != before
    }

    /// Remove the listed body signatures from a head's determination.
    pub fn remove_determination(&mut self, determination: &Determination) -> bool {
        let Some(pos) = self
            .determinations
            .iter()
            .position(|d| d.head == determination.head)
        else {
            return false;
        };
        let existing = &mut self.determinations[pos];
        let before = existing.body.len();
        existing.body.retain(|s| !determination.body.contains(s));
        let removed = existing.body.len() != before;
        if existing.body.is_empty() {
            self.determinations.remove(pos);
        }
        removed
    }

    /// The first head mode for `sig`.
    pub fn head_mode(&self, sig: &Signature) -> Result<&Mode> {
        self.modes
            .iter()
            .find(|m| m.kind == ModeKind::Head && &m.signature() == sig)
            .ok_or_else(|| IlpError::UnknownMode {
                kind: ModeKind::Head.keyword(),
                signature: sig.clone(),
            })
    }

    /// Body modes usable under `head`.
    ///
    /// With a determination for the head's signature, the body modes it names
    /// in determination order; otherwise every body mode.
    pub fn body_modes_for(&self, head: &Mode) -> Vec<&Mode> {
        let head_sig = head.signature();
        match self.determinations.iter().find(|d| d.head == head_sig) {
            Some(det) => det
                .body
                .iter()
                .flat_map(|sig| self.body_modes().filter(move |m| &m.signature() == sig))
                .collect(),
            None => self.body_modes().collect(),
        }
    }

    pub fn modes(&self) -> &[Mode] {
        &self.modes
    }

    pub fn head_modes(&self) -> impl Iterator<Item = &Mode> {
        self.modes.iter().filter(|m| m.kind == ModeKind::Head)
    }

    pub fn body_modes(&self) -> impl Iterator<Item = &Mode> {
        self.modes.iter().filter(|m| m.kind == ModeKind::Body)
    }

    pub fn determinations(&self) -> &[Determination] {
        &self.determinations
    }

    pub fn is_empty(&self) -> bool {
        self.modes.is_empty() && self.determinations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modes::Recall;
    use crate::syntax::{Predicate, Sign, Term};

    fn mode(kind: ModeKind, name: &str, signs: &[Sign]) -> Mode {
        let args = signs
            .iter()
            .map(|s| Term::placeholder(*s, "person"))
            .collect();
        Mode::new(kind, Recall::Unbounded, Predicate::new(name, args)).unwrap()
    }

    fn family_modes() -> ModeCollection {
        let mut modes = ModeCollection::new();
        modes.add_mode(mode(ModeKind::Head, "daughter", &[Sign::Input, Sign::Output]));
        modes.add_mode(mode(ModeKind::Body, "parent", &[Sign::Input, Sign::Output]));
        modes.add_mode(mode(ModeKind::Body, "parent", &[Sign::Output, Sign::Input]));
        modes.add_mode(mode(ModeKind::Body, "female", &[Sign::Input]));
        modes
    }

    #[test]
    fn test_head_mode_lookup() {
        let modes = family_modes();
        assert!(modes.head_mode(&Signature::new("daughter", 2)).is_ok());
        assert!(matches!(
            modes.head_mode(&Signature::new("son", 2)),
            Err(IlpError::UnknownMode { .. })
        ));
    }

    #[test]
    fn test_all_body_modes_without_determinations() {
        let modes = family_modes();
        let head = modes.head_mode(&Signature::new("daughter", 2)).unwrap();
        assert_eq!(modes.body_modes_for(head).len(), 3);
    }

    #[test]
    fn test_determination_restricts_and_keeps_shared_signatures() {
        let mut modes = family_modes();
        modes
            .add_determination(Determination::new(
                Signature::new("daughter", 2),
                vec![Signature::new("parent", 2)],
            ))
            .unwrap();
        let head = modes.head_mode(&Signature::new("daughter", 2)).unwrap().clone();
        let body = modes.body_modes_for(&head);
        assert_eq!(body.len(), 2);
        assert!(body.iter().all(|m| m.atom.name == "parent"));
    }

    #[test]
    fn test_determination_requires_modes() {
        let mut modes = family_modes();
        let err = modes
            .add_determination(Determination::new(
                Signature::new("daughter", 2),
                vec![Signature::new("male", 1)],
            ))
            .unwrap_err();
        assert!(matches!(err, IlpError::UnknownMode { kind: "modeb", .. }));
    }

    #[test]
    fn test_remove_is_tolerant() {
        let mut modes = family_modes();
        let female = mode(ModeKind::Body, "female", &[Sign::Input]);
        assert!(modes.remove_mode(&female));
        assert!(!modes.remove_mode(&female));
        assert!(!modes.remove_determination(&Determination::new(
            Signature::new("daughter", 2),
            vec![]
        )));
    }
}
