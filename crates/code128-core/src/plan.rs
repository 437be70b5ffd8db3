//! The retry matrix as data.
//!
//! A [`DecodePlan`] is an ordered list of (rotation, variant, backend)
//! steps. The orchestrator walks it front to back and stops at the first
//! payload, so the order is the priority.

use serde::{Deserialize, Serialize};

use crate::backend::{RXING, ZBAR, ZXING};
use crate::transform::{Rotation, Variant};

/// One attempt: which image to build and which backend to hand it to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanStep {
    pub rotation: Rotation,
    #[serde(default)]
    pub variant: Variant,
    pub backend: String,
}

impl PlanStep {
    pub fn new(rotation: Rotation, variant: Variant, backend: impl Into<String>) -> Self {
        Self {
            rotation,
            variant,
            backend: backend.into(),
        }
    }
}

/// Ordered list of decode attempts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DecodePlan {
    steps: Vec<PlanStep>,
}

impl Default for DecodePlan {
    fn default() -> Self {
        Self::standard()
    }
}

impl DecodePlan {
    /// Create a plan from explicit steps.
    pub fn new(steps: Vec<PlanStep>) -> Self {
        Self { steps }
    }

    /// The default matrix. For each of 0°, 90°, 180° and 270°:
    /// 1. zbar on the image as is
    /// 2. zxing on the image as is
    /// 3. zxing on a 2x upscale
    /// 4. zbar on a 50% threshold binarization
    /// 5. rxing on the image as is
    pub fn standard() -> Self {
        Self::for_rotations(
            &Rotation::ALL,
            &[
                (Variant::Original, ZBAR),
                (Variant::Original, ZXING),
                (Variant::Upscaled { factor: 2 }, ZXING),
                (Variant::Binarized { threshold: 0.5 }, ZBAR),
                (Variant::Original, RXING),
            ],
        )
    }

    /// Cross product of rotations and per-rotation attempts, rotation-major.
    pub fn for_rotations(rotations: &[Rotation], per_rotation: &[(Variant, &str)]) -> Self {
        let steps = rotations
            .iter()
            .flat_map(|&rotation| {
                per_rotation
                    .iter()
                    .map(move |&(variant, backend)| PlanStep::new(rotation, variant, backend))
            })
            .collect();
        Self { steps }
    }

    pub fn steps(&self) -> &[PlanStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Distinct backend names in order of first use.
    pub fn backends(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for step in &self.steps {
            if !names.contains(&step.backend.as_str()) {
                names.push(&step.backend);
            }
        }
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_plan_shape() {
        let plan = DecodePlan::standard();
        assert_eq!(plan.len(), 20);
        assert_eq!(plan.backends(), vec!["zbar", "zxing", "rxing"]);
    }

    #[test]
    fn test_standard_plan_first_rotation_order() {
        let plan = DecodePlan::standard();
        let first: Vec<_> = plan.steps()[..5]
            .iter()
            .map(|s| (s.rotation, s.variant, s.backend.as_str()))
            .collect();
        assert_eq!(
            first,
            vec![
                (Rotation::Deg0, Variant::Original, "zbar"),
                (Rotation::Deg0, Variant::Original, "zxing"),
                (Rotation::Deg0, Variant::Upscaled { factor: 2 }, "zxing"),
                (Rotation::Deg0, Variant::Binarized { threshold: 0.5 }, "zbar"),
                (Rotation::Deg0, Variant::Original, "rxing"),
            ]
        );
    }

    #[test]
    fn test_rotation_major_order() {
        let plan = DecodePlan::standard();
        let rotations: Vec<Rotation> = plan.steps().iter().map(|s| s.rotation).collect();
        for (i, chunk) in rotations.chunks(5).enumerate() {
            assert!(chunk.iter().all(|&r| r == Rotation::ALL[i]));
        }
    }

    #[test]
    fn test_for_rotations_subset() {
        let plan = DecodePlan::for_rotations(
            &[Rotation::Deg90],
            &[(Variant::Contrast { amount: 30.0 }, "custom")],
        );
        assert_eq!(
            plan.steps(),
            &[PlanStep::new(
                Rotation::Deg90,
                Variant::Contrast { amount: 30.0 },
                "custom"
            )]
        );
    }

    #[test]
    fn test_empty_plan() {
        let plan = DecodePlan::new(vec![]);
        assert!(plan.is_empty());
        assert!(plan.backends().is_empty());
    }

    #[test]
    fn test_plan_from_json() {
        let json = r#"[
            {"rotation": "0", "backend": "rxing"},
            {"rotation": "90", "variant": {"kind": "upscaled", "factor": 3}, "backend": "zxing"}
        ]"#;
        let plan: DecodePlan = serde_json::from_str(json).unwrap();
        assert_eq!(plan.len(), 2);
        assert_eq!(plan.steps()[0].variant, Variant::Original);
        assert_eq!(plan.steps()[1].variant, Variant::Upscaled { factor: 3 });
        assert_eq!(plan.backends(), vec!["rxing", "zxing"]);
    }
}
