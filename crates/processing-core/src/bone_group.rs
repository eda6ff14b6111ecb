//! Coarse anatomical grouping of bone names.

use serde::Serialize;

/// Anatomical region a bone belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum BoneGroup {
    Root,
    Legs,
    Arms,
    SpineHead,
    Other,
}

/// Groups in matching order with their substring keys. The first group
/// with any key contained in the lowercased bone name wins.
const GROUP_KEYS: &[(BoneGroup, &[&str])] = &[
    (BoneGroup::Root, &["root", "pelvis"]),
    (BoneGroup::Legs, &["thigh", "shin", "foot", "toe"]),
    (BoneGroup::Arms, &["shoulder", "upper_arm", "forearm", "hand"]),
    (BoneGroup::SpineHead, &["spine", "neck", "head"]),
];

impl BoneGroup {
    pub fn classify(bone: &str) -> Self {
        let lowered = bone.to_lowercase();
        GROUP_KEYS
            .iter()
            .find(|(_, keys)| keys.iter().any(|key| lowered.contains(key)))
            .map(|(group, _)| *group)
            .unwrap_or(BoneGroup::Other)
    }

    pub fn label(&self) -> &'static str {
        match self {
            BoneGroup::Root => "root",
            BoneGroup::Legs => "legs",
            BoneGroup::Arms => "arms",
            BoneGroup::SpineHead => "spineHead",
            BoneGroup::Other => "other",
        }
    }
}

impl std::fmt::Display for BoneGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rig_bones_classify() {
        assert_eq!(BoneGroup::classify("DEF-upper_arm.L"), BoneGroup::Arms);
        assert_eq!(BoneGroup::classify("DEF-thigh.L"), BoneGroup::Legs);
        assert_eq!(BoneGroup::classify("DEF-toe.R"), BoneGroup::Legs);
        assert_eq!(BoneGroup::classify("root"), BoneGroup::Root);
        assert_eq!(BoneGroup::classify("Pelvis"), BoneGroup::Root);
        assert_eq!(BoneGroup::classify("DEF-spine.003"), BoneGroup::SpineHead);
        assert_eq!(BoneGroup::classify("DEF-HAND.R"), BoneGroup::Arms);
    }

    #[test]
    fn unmatched_bone_is_other() {
        assert_eq!(BoneGroup::classify("tail_tip"), BoneGroup::Other);
        assert_eq!(BoneGroup::classify(""), BoneGroup::Other);
    }

    #[test]
    fn earlier_group_wins_on_overlap() {
        // Contains both "root" and "foot".
        assert_eq!(BoneGroup::classify("foot_root"), BoneGroup::Root);
        // Contains both "shin" and "head".
        assert_eq!(BoneGroup::classify("shin_head"), BoneGroup::Legs);
    }

    #[test]
    fn labels_match_serialized_names() {
        for group in [
            BoneGroup::Root,
            BoneGroup::Legs,
            BoneGroup::Arms,
            BoneGroup::SpineHead,
            BoneGroup::Other,
        ] {
            let json = serde_json::to_string(&group).unwrap();
            assert_eq!(json, format!("\"{}\"", group.label()));
        }
    }
}
