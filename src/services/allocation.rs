//! Allocation engine
//!
//! Owns the authoritative total balance and the per-category sub-balances.
//! Money entering the account is split across categories by weight, each
//! share rounded to whole cents, and whatever rounding leaves over lands in
//! the budget's catch-all category. After every operation the category
//! balances add up to the total balance exactly.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{CheckbookError, CheckbookResult};
use crate::models::{Budget, BudgetLine, CategoryName, Money, Weight};

/// Category balances allocated from a single total balance
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AllocationEngine {
    total_balance: Money,
    budget: Budget,
    balances: BTreeMap<CategoryName, Money>,
}

/// Read-only view of one category, for display and chart sinks
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySnapshot {
    pub name: CategoryName,
    pub weight: Weight,
    pub balance: Money,
    pub is_catch_all: bool,
}

/// Read-only view of the whole engine, categories in budget order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AllocationSnapshot {
    pub total_balance: Money,
    pub categories: Vec<CategorySnapshot>,
}

impl AllocationEngine {
    /// Create an engine holding `starting_balance`, allocated under `budget`
    pub fn new(starting_balance: Money, budget: Budget) -> CheckbookResult<Self> {
        if starting_balance.is_negative() {
            return Err(CheckbookError::InvalidAmount(format!(
                "Starting balance cannot be negative: {}",
                starting_balance
            )));
        }

        let mut engine = Self {
            total_balance: starting_balance,
            balances: zeroed_balances(&budget),
            budget,
        };
        engine.allocate(starting_balance);
        Ok(engine)
    }

    /// Spread `amount` over every category
    ///
    /// `total_balance` must already include `amount`. Callers never pass a
    /// negative amount.
    fn allocate(&mut self, amount: Money) {
        let catch_all = self.budget.catch_all().clone();

        let portions: Vec<(CategoryName, Money)> = self
            .budget
            .funded_lines()
            .map(|line| (line.category.clone(), amount.portion(line.weight)))
            .collect();
        let distributed: Money = portions.iter().map(|(_, portion)| *portion).sum();

        for (category, portion) in portions {
            *self.balances.entry(category).or_default() += portion;
        }
        *self.balances.entry(catch_all).or_default() += amount - distributed;

        self.reconcile();
    }

    /// Push any difference between the category sum and the total into the
    /// catch-all category
    fn reconcile(&mut self) {
        let drift = self.total_balance - self.category_sum();
        if drift.is_zero() {
            return;
        }

        let catch_all = self.budget.catch_all().clone();
        tracing::debug!(
            catch_all = %catch_all,
            drift = %drift,
            "reconciling category balances against total"
        );
        *self.balances.entry(catch_all).or_default() += drift;
    }

    /// Add `amount` to the total balance and allocate it across categories
    ///
    /// # Errors
    ///
    /// `InvalidAmount` if `amount` is not positive or would push the total
    /// or any category past what a balance can hold; the engine is unchanged.
    pub fn deposit(&mut self, amount: Money) -> CheckbookResult<()> {
        if !amount.is_positive() {
            return Err(CheckbookError::InvalidAmount(format!(
                "Deposit must be positive, got {}",
                amount
            )));
        }

        // No share, the catch-all residual included, exceeds `amount`
        let total = self
            .total_balance
            .checked_add(amount)
            .filter(|_| self.balances.values().all(|b| b.checked_add(amount).is_some()))
            .ok_or_else(|| too_large("Deposit", amount))?;

        self.total_balance = total;
        self.allocate(amount);
        Ok(())
    }

    /// Take `amount` out of a single category
    ///
    /// The category may go negative; no reconciliation runs.
    ///
    /// # Errors
    ///
    /// `InvalidAmount` if `amount` is not positive, `UnknownCategory` if the
    /// category is not in the budget. The engine is unchanged on error.
    pub fn withdraw(&mut self, category: &CategoryName, amount: Money) -> CheckbookResult<()> {
        if !amount.is_positive() {
            return Err(CheckbookError::InvalidAmount(format!(
                "Withdrawal must be positive, got {}",
                amount
            )));
        }

        let balance = self
            .balances
            .get_mut(category)
            .ok_or_else(|| CheckbookError::unknown_category(category.as_str()))?;

        let remaining = balance
            .checked_sub(amount)
            .ok_or_else(|| too_large("Withdrawal", amount))?;
        let total = self
            .total_balance
            .checked_sub(amount)
            .ok_or_else(|| too_large("Withdrawal", amount))?;

        *balance = remaining;
        self.total_balance = total;
        Ok(())
    }

    /// Validate a new budget and, if it holds, redistribute the whole
    /// balance under it
    ///
    /// # Errors
    ///
    /// Any error from [`Budget::new`], most notably `InvalidBudget` with the
    /// computed weight sum. The budget and balances are left untouched.
    pub fn change_budget(
        &mut self,
        lines: Vec<BudgetLine>,
        catch_all: CategoryName,
    ) -> CheckbookResult<()> {
        let budget = Budget::new(lines, catch_all).map_err(|err| {
            tracing::warn!(error = %err, "rejected budget change");
            err
        })?;
        self.apply_budget(budget);
        Ok(())
    }

    /// Replace the budget with an already validated one and reallocate
    pub fn apply_budget(&mut self, budget: Budget) {
        self.balances = zeroed_balances(&budget);
        self.budget = budget;
        self.allocate(self.total_balance);
    }

    /// The authoritative total balance
    pub fn total_balance(&self) -> Money {
        self.total_balance
    }

    /// The current budget
    pub fn budget(&self) -> &Budget {
        &self.budget
    }

    /// Balance held by `category`
    pub fn balance_of(&self, category: &CategoryName) -> Option<Money> {
        self.balances.get(category).copied()
    }

    /// Sum of every category balance
    pub fn category_sum(&self) -> Money {
        self.balances.values().sum()
    }

    /// Whether the category balances add up to the total balance
    pub fn is_reconciled(&self) -> bool {
        self.category_sum() == self.total_balance
    }

    /// Read-only view for display, in budget order
    pub fn snapshot(&self) -> AllocationSnapshot {
        let catch_all = self.budget.catch_all();
        let categories = self
            .budget
            .lines()
            .iter()
            .map(|line| CategorySnapshot {
                name: line.category.clone(),
                weight: line.weight,
                balance: self.balances.get(&line.category).copied().unwrap_or_default(),
                is_catch_all: &line.category == catch_all,
            })
            .collect();

        AllocationSnapshot {
            total_balance: self.total_balance,
            categories,
        }
    }
}

fn too_large(operation: &str, amount: Money) -> CheckbookError {
    CheckbookError::InvalidAmount(format!(
        "{} of {} is larger than the account can hold",
        operation, amount
    ))
}

fn zeroed_balances(budget: &Budget) -> BTreeMap<CategoryName, Money> {
    budget
        .categories()
        .map(|category| (category.clone(), Money::zero()))
        .collect()
}

/// Serialized engine state; checked for consistency when loaded
#[derive(Deserialize)]
struct EngineState {
    total_balance: Money,
    budget: Budget,
    balances: BTreeMap<CategoryName, Money>,
}

impl<'de> Deserialize<'de> for AllocationEngine {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let state = EngineState::deserialize(deserializer)?;

        let same_categories = state.balances.len() == state.budget.lines().len()
            && state.budget.categories().all(|c| state.balances.contains_key(c));
        if !same_categories {
            return Err(serde::de::Error::custom(
                "category balances do not match the budget",
            ));
        }

        let sum: Money = state.balances.values().sum();
        if sum != state.total_balance {
            return Err(serde::de::Error::custom(format!(
                "category balances sum to {} but total balance is {}",
                sum, state.total_balance
            )));
        }

        Ok(Self {
            total_balance: state.total_balance,
            budget: state.budget,
            balances: state.balances,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> CategoryName {
        CategoryName::new(s).unwrap()
    }

    fn line(s: &str, ppm: i64) -> BudgetLine {
        BudgetLine::new(name(s), Weight::from_ppm(ppm))
    }

    fn cents(c: i64) -> Money {
        Money::from_cents(c)
    }

    fn standard_engine() -> AllocationEngine {
        AllocationEngine::new(cents(100_000), Budget::standard()).unwrap()
    }

    #[test]
    fn test_construct_allocates_starting_balance() {
        let engine = standard_engine();

        assert_eq!(engine.total_balance(), cents(100_000));
        assert_eq!(engine.balance_of(&name("housing")), Some(cents(30_000)));
        assert_eq!(engine.balance_of(&name("food")), Some(cents(20_000)));
        assert_eq!(engine.balance_of(&name("car")), Some(cents(25_000)));
        assert_eq!(engine.balance_of(&name("clothing")), Some(cents(10_000)));
        assert_eq!(engine.balance_of(&name("entertainment")), Some(cents(10_000)));
        assert_eq!(engine.balance_of(&name("other")), Some(cents(5_000)));
        assert_eq!(engine.category_sum(), cents(100_000));
    }

    #[test]
    fn test_construct_rejects_negative_start() {
        let err = AllocationEngine::new(cents(-1), Budget::standard()).unwrap_err();
        assert!(matches!(err, CheckbookError::InvalidAmount(_)));
    }

    #[test]
    fn test_deposit_rounds_each_share_and_catch_all_absorbs_rest() {
        let mut engine = standard_engine();
        engine.deposit(cents(3333)).unwrap();

        assert_eq!(engine.total_balance(), cents(103_333));
        assert_eq!(engine.balance_of(&name("housing")), Some(cents(31_000)));
        assert_eq!(engine.balance_of(&name("food")), Some(cents(20_667)));
        assert_eq!(engine.balance_of(&name("car")), Some(cents(25_833)));
        assert_eq!(engine.balance_of(&name("clothing")), Some(cents(10_333)));
        assert_eq!(engine.balance_of(&name("entertainment")), Some(cents(10_333)));
        assert_eq!(engine.balance_of(&name("other")), Some(cents(5_167)));
        assert_eq!(engine.category_sum(), cents(103_333));
    }

    #[test]
    fn test_withdraw_can_overdraw_a_category() {
        let mut engine = standard_engine();
        engine.withdraw(&name("housing"), cents(50_000)).unwrap();

        assert_eq!(engine.balance_of(&name("housing")), Some(cents(-20_000)));
        assert_eq!(engine.total_balance(), cents(50_000));
        // Other categories are not touched by reconciliation
        assert_eq!(engine.balance_of(&name("other")), Some(cents(5_000)));
        assert!(engine.is_reconciled());
    }

    #[test]
    fn test_withdraw_validation_leaves_state_unchanged() {
        let mut engine = standard_engine();
        let before = engine.clone();

        assert!(matches!(
            engine.withdraw(&name("boats"), cents(100)),
            Err(CheckbookError::UnknownCategory(n)) if n == "boats"
        ));
        assert!(matches!(
            engine.withdraw(&name("food"), cents(0)),
            Err(CheckbookError::InvalidAmount(_))
        ));
        assert_eq!(engine, before);
    }

    #[test]
    fn test_deposit_rejects_non_positive() {
        let mut engine = standard_engine();
        let before = engine.clone();

        assert!(matches!(
            engine.deposit(cents(0)),
            Err(CheckbookError::InvalidAmount(_))
        ));
        assert!(matches!(
            engine.deposit(cents(-500)),
            Err(CheckbookError::InvalidAmount(_))
        ));
        assert_eq!(engine, before);
    }

    #[test]
    fn test_rejected_budget_change_is_a_no_op() {
        let mut engine = standard_engine();
        engine.deposit(cents(3333)).unwrap();
        let before = engine.clone();

        let err = engine
            .change_budget(
                vec![line("housing", 500_000), line("other", 450_000)],
                name("other"),
            )
            .unwrap_err();

        match err {
            CheckbookError::InvalidBudget { sum } => assert_eq!(sum.to_string(), "0.95"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(engine, before);
    }

    #[test]
    fn test_change_budget_redistributes_everything() {
        let mut engine = standard_engine();
        engine.withdraw(&name("housing"), cents(50_000)).unwrap();

        engine
            .change_budget(
                vec![line("rent", 333_333), line("food", 333_333), line("misc", 333_334)],
                name("misc"),
            )
            .unwrap();

        assert_eq!(engine.total_balance(), cents(50_000));
        assert_eq!(engine.balance_of(&name("rent")), Some(cents(16_667)));
        assert_eq!(engine.balance_of(&name("food")), Some(cents(16_667)));
        assert_eq!(engine.balance_of(&name("misc")), Some(cents(16_666)));
        assert_eq!(engine.balance_of(&name("housing")), None);
        assert!(engine.is_reconciled());
    }

    #[test]
    fn test_single_category_budget_has_no_drift() {
        let budget = Budget::new(vec![line("savings", 1_000_000)], name("savings")).unwrap();
        let mut engine = AllocationEngine::new(cents(1_000), budget).unwrap();

        engine.deposit(cents(1)).unwrap();
        engine.deposit(cents(1)).unwrap();

        assert_eq!(engine.balance_of(&name("savings")), Some(cents(1_002)));
        assert_eq!(engine.total_balance(), cents(1_002));
    }

    #[test]
    fn test_catch_all_absorbs_weight_shortfall() {
        let budget = Budget::new(
            vec![line("a", 495_000), line("b", 495_000), line("rest", 0)],
            name("rest"),
        )
        .unwrap();
        let engine = AllocationEngine::new(cents(10_000), budget).unwrap();

        assert_eq!(engine.balance_of(&name("a")), Some(cents(4_950)));
        assert_eq!(engine.balance_of(&name("rest")), Some(cents(100)));
        assert!(engine.is_reconciled());
    }

    #[test]
    fn test_closure_holds_over_many_operations() {
        let budget = Budget::new(
            vec![
                line("a", 333_333),
                line("b", 166_667),
                line("c", 123_457),
                line("d", 76_543),
                line("z", 300_000),
            ],
            name("z"),
        )
        .unwrap();
        let mut engine = AllocationEngine::new(cents(12_345), budget).unwrap();

        // Deterministic pseudo-random amounts
        let mut seed: u64 = 0x2545_f491;
        for i in 0..500 {
            seed = seed.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
            let amount = cents((seed >> 33) as i64 % 100_000 + 1);
            if i % 7 == 3 {
                engine.withdraw(&name("c"), amount).unwrap();
            } else {
                engine.deposit(amount).unwrap();
            }
            assert!(engine.is_reconciled(), "drift after operation {i}");
        }

        let total = engine.total_balance();
        engine.apply_budget(Budget::standard());
        assert_eq!(engine.total_balance(), total);
        assert!(engine.is_reconciled());
    }

    #[test]
    fn test_oversized_amounts_are_rejected() {
        let mut engine = standard_engine();
        let before = engine.clone();

        let huge = Money::parse("92233720368547758.07").unwrap();
        let err = engine.deposit(huge).unwrap_err();
        assert!(matches!(err, CheckbookError::InvalidAmount(_)));
        assert_eq!(engine, before);

        engine.withdraw(&name("food"), huge).unwrap();
        let after_first = engine.clone();
        let err = engine.withdraw(&name("food"), huge).unwrap_err();
        assert!(matches!(err, CheckbookError::InvalidAmount(_)));
        assert_eq!(engine, after_first);
        assert!(engine.is_reconciled());
    }

    #[test]
    fn test_reconcile_moves_drift_into_catch_all() {
        // Category sum above the total
        let mut engine = standard_engine();
        *engine.balances.get_mut(&name("housing")).unwrap() += cents(1);
        engine.deposit(cents(10_000)).unwrap();
        assert!(engine.is_reconciled());
        assert_eq!(engine.balance_of(&name("housing")), Some(cents(33_001)));
        assert_eq!(engine.balance_of(&name("other")), Some(cents(5_499)));

        // Category sum below the total
        let mut engine = standard_engine();
        *engine.balances.get_mut(&name("food")).unwrap() -= cents(2);
        engine.deposit(cents(10_000)).unwrap();
        assert!(engine.is_reconciled());
        assert_eq!(engine.balance_of(&name("food")), Some(cents(21_998)));
        assert_eq!(engine.balance_of(&name("other")), Some(cents(5_502)));
    }

    #[test]
    fn test_snapshot_follows_budget_order() {
        let snapshot = standard_engine().snapshot();
        let names: Vec<_> = snapshot.categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            ["housing", "food", "car", "clothing", "entertainment", "other"]
        );
        assert!(snapshot.categories.last().unwrap().is_catch_all);
        let sum: Money = snapshot.categories.iter().map(|c| c.balance).sum();
        assert_eq!(sum, snapshot.total_balance);
    }

    #[test]
    fn test_state_roundtrip_is_validated() {
        let mut engine = standard_engine();
        engine.deposit(cents(3333)).unwrap();

        let json = serde_json::to_string(&engine).unwrap();
        let back: AllocationEngine = serde_json::from_str(&json).unwrap();
        assert_eq!(back, engine);

        let tampered = json.replace("103333", "103334");
        assert!(serde_json::from_str::<AllocationEngine>(&tampered).is_err());
    }
}
