//! Sub-query budgeting

use pelorus_domain::SubQuery;

/// Budget a full sub-query list down to at most `max` entries
///
/// Stable-sorts by priority rank (high < medium < low); ties preserve the
/// original input order. The result is truncated to `max`.
pub fn budget_sub_queries(mut sub_queries: Vec<SubQuery>, max: usize) -> Vec<SubQuery> {
    sub_queries.sort_by_key(|sq| sq.priority.rank());
    sub_queries.truncate(max);
    sub_queries
}

#[cfg(test)]
mod tests {
    use super::*;
    use pelorus_domain::Priority;

    fn sq(text: &str, priority: Priority) -> SubQuery {
        SubQuery::new(text, "test", priority)
    }

    #[test]
    fn test_priority_ordering_with_stable_ties() {
        let input = vec![
            sq("m1", Priority::Medium),
            sq("l1", Priority::Low),
            sq("h1", Priority::High),
            sq("m2", Priority::Medium),
            sq("h2", Priority::High),
        ];

        let budgeted = budget_sub_queries(input, 10);
        let order: Vec<&str> = budgeted.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(order, vec!["h1", "h2", "m1", "m2", "l1"]);
    }

    #[test]
    fn test_truncation_at_budget() {
        // 15 mixed-priority queries against a budget of 10
        let mut input = Vec::new();
        for i in 0..5 {
            input.push(sq(&format!("low{}", i), Priority::Low));
        }
        for i in 0..5 {
            input.push(sq(&format!("high{}", i), Priority::High));
        }
        for i in 0..5 {
            input.push(sq(&format!("med{}", i), Priority::Medium));
        }

        let budgeted = budget_sub_queries(input, 10);
        assert_eq!(budgeted.len(), 10);

        // All high first, then all medium, preserving relative input order
        for i in 0..5 {
            assert_eq!(budgeted[i].text, format!("high{}", i));
            assert_eq!(budgeted[5 + i].text, format!("med{}", i));
        }
        // Low-priority queries fell off the budget entirely
        assert!(budgeted.iter().all(|s| s.priority != Priority::Low));
    }

    #[test]
    fn test_under_budget_is_untouched() {
        let input = vec![sq("a", Priority::Low), sq("b", Priority::High)];
        let budgeted = budget_sub_queries(input, 10);
        assert_eq!(budgeted.len(), 2);
        assert_eq!(budgeted[0].text, "b");
    }

    #[test]
    fn test_empty_input() {
        assert!(budget_sub_queries(Vec::new(), 10).is_empty());
    }
}
