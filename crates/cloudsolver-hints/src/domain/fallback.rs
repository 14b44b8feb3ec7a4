//! Local hint templates used when the advisory service cannot help.

use cloudsolver_content::domain::npc::{NpcProfile, apply_hint_template};
use cloudsolver_core::rng::{DeterministicRng, choose_index};

use super::hint::clamp_hint_level;

type LevelBodies = [&'static str; 3];

const EC2: LevelBodies = [
    "Think about instance scalability and load balancing.",
    "Consider pairing an Auto Scaling group with an Application Load Balancer.",
    "Design a complete architecture with Multi-AZ deployment and CloudWatch monitoring.",
];

const S3: LevelBodies = [
    "Think about storage classes and access patterns.",
    "Pick a suitable storage class such as Standard-IA or Glacier.",
    "Build a full storage strategy with lifecycle policies and versioning.",
];

const LAMBDA: LevelBodies = [
    "Think about a serverless, event-driven design.",
    "Consider combining Lambda with API Gateway and DynamoDB.",
    "Add workflow orchestration with Step Functions.",
];

const RDS: LevelBodies = [
    "Think about database availability and backup strategy.",
    "Consider a Multi-AZ deployment and read replicas.",
    "Design a complete database solution with automated backups, monitoring and \
     performance tuning.",
];

const VPC: LevelBodies = [
    "Think about network security and subnet layout.",
    "Consider public and private subnets with a NAT Gateway.",
    "Design the full network with security groups, NACLs and VPC endpoints.",
];

const GENERIC: LevelBodies = [
    "Try leaning on AWS managed services.",
    "Balance high availability against cost.",
    "Design a complete solution that includes monitoring and automation.",
];

/// The local hint body for `category` at `hint_level`. Unknown categories get
/// a generic body; levels outside `1..=3` are clamped.
#[must_use]
pub fn fallback_body(category: &str, hint_level: u8) -> &'static str {
    let bodies = match category.trim().to_ascii_uppercase().as_str() {
        "EC2" => &EC2,
        "S3" => &S3,
        "LAMBDA" => &LAMBDA,
        "RDS" => &RDS,
        "VPC" => &VPC,
        _ => &GENERIC,
    };
    bodies[usize::from(clamp_hint_level(hint_level)) - 1]
}

/// Wraps `body` in one of the NPC's hint templates, chosen through `rng`.
/// Without a profile the body is returned unchanged.
#[must_use]
pub fn phrase_hint(npc: Option<&NpcProfile>, body: &str, rng: &mut dyn DeterministicRng) -> String {
    let Some(npc) = npc else {
        return body.to_owned();
    };
    match choose_index(rng, npc.hint_templates.len()) {
        Some(i) => apply_hint_template(&npc.hint_templates[i], body),
        None => body.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloudsolver_content::domain::roster::NpcRoster;
    use cloudsolver_test_support::{MockRng, SequenceRng};

    #[test]
    fn test_fallback_body_by_category_and_level() {
        assert_eq!(fallback_body("EC2", 1), EC2[0]);
        assert_eq!(fallback_body("s3", 2), S3[1]);
        assert_eq!(fallback_body("Lambda", 3), LAMBDA[2]);
        assert_eq!(fallback_body("RDS", 1), RDS[0]);
        assert_eq!(fallback_body("VPC", 2), VPC[1]);
    }

    #[test]
    fn test_fallback_body_unknown_category_is_generic() {
        assert_eq!(fallback_body("IAM", 1), GENERIC[0]);
        assert_eq!(fallback_body("", 3), GENERIC[2]);
    }

    #[test]
    fn test_fallback_body_clamps_level() {
        assert_eq!(fallback_body("EC2", 0), EC2[0]);
        assert_eq!(fallback_body("EC2", 9), EC2[2]);
    }

    #[test]
    fn test_phrase_hint_uses_selected_template() {
        // Arrange
        let roster = NpcRoster::builtin().unwrap();
        let mike = roster.get("mike_security");

        // Act
        let first = phrase_hint(mike, "Use a NAT Gateway.", &mut MockRng);
        let second = phrase_hint(mike, "Use a NAT Gateway.", &mut SequenceRng::new(vec![1]));

        // Assert
        assert_eq!(
            first,
            "Mike: For safety's sake... Use a NAT Gateway. That is what I'd recommend."
        );
        assert_eq!(second, "Mike: Security first. Use a NAT Gateway.");
    }

    #[test]
    fn test_phrase_hint_without_npc_returns_body() {
        assert_eq!(phrase_hint(None, "Plain.", &mut MockRng), "Plain.");
    }
}
