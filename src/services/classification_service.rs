// src/services/classification_service.rs

use std::cmp::Ordering;

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{error::AppError, validation::normalize_optional},
    db::AutoAnalyticalRepository,
    models::analytical::{
        AutoAnalyticalModel, ClassificationInput, ClassificationOutcome, RuleEvaluation, RuleView,
    },
};

// =============================================================================
//  RULE EVALUATION (pure)
// =============================================================================

/// A rule matches on product id OR on category. Category comparison is exact
/// and case-sensitive; a blank category on the rule counts as unset.
pub fn rule_matches(rule: &AutoAnalyticalModel, input: &ClassificationInput) -> bool {
    let product_hit = match (rule.match_product_id, input.product_id) {
        (Some(wanted), Some(given)) => wanted == given,
        _ => false,
    };

    let category_hit = match (rule.match_category.as_deref(), input.category.as_deref()) {
        (Some(wanted), Some(given)) if !wanted.trim().is_empty() => wanted == given,
        _ => false,
    };

    product_hit || category_hit
}

// Higher priority first, then older rules, then lower id
fn precedence(a: &AutoAnalyticalModel, b: &AutoAnalyticalModel) -> Ordering {
    b.priority
        .cmp(&a.priority)
        .then_with(|| a.created_at.cmp(&b.created_at))
        .then_with(|| a.id.cmp(&b.id))
}

/// Picks the winning rule among those that match, if any.
pub fn select_rule<'a>(
    rules: &'a [AutoAnalyticalModel],
    input: &ClassificationInput,
) -> Option<&'a AutoAnalyticalModel> {
    rules
        .iter()
        .filter(|rule| rule_matches(rule, input))
        .min_by(|a, b| precedence(a, b))
}

pub fn classify_with_rules(
    rules: &[AutoAnalyticalModel],
    input: &ClassificationInput,
) -> ClassificationOutcome {
    let mut ordered: Vec<&AutoAnalyticalModel> = rules.iter().collect();
    ordered.sort_by(|a, b| precedence(a, b));

    let examined = ordered
        .iter()
        .map(|rule| RuleEvaluation {
            rule_id: rule.id,
            name: rule.name.clone(),
            priority: rule.priority,
            matched: rule_matches(rule, input),
        })
        .collect();

    let winner = select_rule(rules, input);

    ClassificationOutcome {
        analytical_account_id: winner.map(|r| r.analytical_account_id),
        matched_rule_id: winner.map(|r| r.id),
        examined,
    }
}

// =============================================================================
//  SERVICE
// =============================================================================

#[derive(Clone)]
pub struct ClassificationService {
    repo: AutoAnalyticalRepository,
    pool: PgPool,
}

impl ClassificationService {
    pub fn new(repo: AutoAnalyticalRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    pub async fn list_views(&self) -> Result<Vec<RuleView>, AppError> {
        self.repo.list_views(&self.pool).await
    }

    pub async fn create_rule(
        &self,
        name: &str,
        analytical_account_id: Uuid,
        match_product_id: Option<Uuid>,
        match_category: Option<&str>,
        priority: i32,
    ) -> Result<AutoAnalyticalModel, AppError> {
        let match_category = normalize_optional(match_category);

        let rule = self
            .repo
            .create(
                &self.pool,
                name.trim(),
                analytical_account_id,
                match_product_id,
                match_category.as_deref(),
                priority,
            )
            .await?;

        tracing::info!(
            "Auto-analytical rule {} created (priority {}, account {})",
            rule.id,
            rule.priority,
            rule.analytical_account_id
        );
        Ok(rule)
    }

    pub async fn classify(&self, input: &ClassificationInput) -> Result<ClassificationOutcome, AppError> {
        let rules = self.repo.list_rules(&self.pool).await?;
        let outcome = classify_with_rules(&rules, input);

        match outcome.matched_rule_id {
            Some(rule_id) => tracing::debug!("Classified by rule {}", rule_id),
            None => tracing::debug!("No rule matched {:?}", input),
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn rule(category: Option<&str>, product: Option<Uuid>, priority: i32) -> AutoAnalyticalModel {
        AutoAnalyticalModel {
            id: Uuid::new_v4(),
            name: format!("rule p{}", priority),
            analytical_account_id: Uuid::new_v4(),
            match_product_id: product,
            match_category: category.map(str::to_string),
            priority,
            created_at: Utc.with_ymd_and_hms(2026, 1, 1, 9, 0, 0).unwrap(),
        }
    }

    fn by_category(category: &str) -> ClassificationInput {
        ClassificationInput {
            product_id: None,
            category: Some(category.to_string()),
        }
    }

    #[test]
    fn test_higher_priority_wins() {
        let low = rule(Some("Wood"), None, 1);
        let high = rule(Some("Wood"), None, 5);
        let rules = vec![low.clone(), high.clone()];

        let outcome = classify_with_rules(&rules, &by_category("Wood"));
        assert_eq!(outcome.analytical_account_id, Some(high.analytical_account_id));
        assert_eq!(outcome.matched_rule_id, Some(high.id));
    }

    #[test]
    fn test_no_match_yields_no_account() {
        let rules = vec![rule(Some("Wood"), None, 1)];
        let outcome = classify_with_rules(&rules, &by_category("Metal"));
        assert_eq!(outcome.analytical_account_id, None);
        assert_eq!(outcome.matched_rule_id, None);
        assert_eq!(outcome.examined.len(), 1);
        assert!(!outcome.examined[0].matched);
    }

    #[test]
    fn test_no_rules_at_all() {
        let outcome = classify_with_rules(&[], &by_category("Wood"));
        assert_eq!(outcome.analytical_account_id, None);
        assert!(outcome.examined.is_empty());
    }

    #[test]
    fn test_product_match() {
        let product_id = Uuid::new_v4();
        let r = rule(None, Some(product_id), 0);
        let input = ClassificationInput {
            product_id: Some(product_id),
            category: None,
        };
        assert!(rule_matches(&r, &input));
        assert!(!rule_matches(&r, &ClassificationInput::default()));
    }

    #[test]
    fn test_product_or_category_is_enough() {
        let product_id = Uuid::new_v4();
        let r = rule(Some("Wood"), Some(product_id), 0);
        let other_product = ClassificationInput {
            product_id: Some(Uuid::new_v4()),
            category: Some("Wood".into()),
        };
        assert!(rule_matches(&r, &other_product));
    }

    #[test]
    fn test_category_is_case_sensitive() {
        let r = rule(Some("Wood"), None, 0);
        assert!(!rule_matches(&r, &by_category("wood")));
        assert!(!rule_matches(&r, &by_category("Wood ")));
        assert!(rule_matches(&r, &by_category("Wood")));
    }

    #[test]
    fn test_rule_without_criteria_never_matches() {
        let empty = rule(None, None, 100);
        let blank = rule(Some("   "), None, 100);
        let input = ClassificationInput {
            product_id: Some(Uuid::new_v4()),
            category: Some("   ".into()),
        };
        assert!(!rule_matches(&empty, &input));
        assert!(!rule_matches(&blank, &input));
    }

    #[test]
    fn test_tie_goes_to_earliest_rule() {
        let older = rule(Some("Wood"), None, 3);
        let mut newer = rule(Some("Wood"), None, 3);
        newer.created_at = older.created_at + Duration::minutes(5);

        let rules = vec![newer.clone(), older.clone()];
        let winner = select_rule(&rules, &by_category("Wood")).unwrap();
        assert_eq!(winner.id, older.id);
    }

    #[test]
    fn test_full_tie_goes_to_lowest_id() {
        let mut a = rule(Some("Wood"), None, 3);
        let mut b = rule(Some("Wood"), None, 3);
        a.id = Uuid::from_u128(2);
        b.id = Uuid::from_u128(1);

        let rules = vec![a, b.clone()];
        let winner = select_rule(&rules, &by_category("Wood")).unwrap();
        assert_eq!(winner.id, b.id);
    }

    #[test]
    fn test_examined_list_is_in_evaluation_order() {
        let low = rule(Some("Metal"), None, 1);
        let high = rule(Some("Wood"), None, 9);
        let mid = rule(Some("Wood"), None, 4);
        let rules = vec![low.clone(), high.clone(), mid.clone()];

        let outcome = classify_with_rules(&rules, &by_category("Wood"));
        let order: Vec<Uuid> = outcome.examined.iter().map(|e| e.rule_id).collect();
        assert_eq!(order, vec![high.id, mid.id, low.id]);

        let matched: Vec<bool> = outcome.examined.iter().map(|e| e.matched).collect();
        assert_eq!(matched, vec![true, true, false]);
    }
}
