//! The balance engine: aggregates the expense list into per-person totals,
//! a signed net balance and a settlement verdict.
//!
//! Everything here is a pure function of the expense list and the chosen
//! display currency; nothing is persisted.

use serde::Serialize;

use crate::models::{Currency, Expense, Participant, convert};

/// Net balances whose magnitude is below one display-currency unit are
/// treated as settled, to absorb rounding noise from repeated conversion.
pub const SETTLED_TOLERANCE: f64 = 1.0;

/// Per-person totals and the net balance for a list of expenses, all in a
/// single display currency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceSummary {
    /// The currency every amount below is expressed in.
    pub display_currency: Currency,
    /// Everything Ron fronted, paid and unpaid expenses alike.
    pub ron_paid_total: f64,
    /// Everything Jin fronted, paid and unpaid expenses alike.
    pub jin_paid_total: f64,
    /// The combined total of all expenses.
    pub total: f64,
    /// Half the combined total minus Ron's paid total.
    ///
    /// Positive means Ron owes Jin; negative means Jin owes Ron. The
    /// settlement flag on individual expenses never enters this figure.
    pub net_balance: f64,
}

impl BalanceSummary {
    /// Aggregate `expenses` into a summary in `display_currency`.
    ///
    /// Every amount is converted from its native currency first. Both paid
    /// and unpaid expenses are included: the paid flag tracks settlement of
    /// individual debts, not participation in the balance.
    pub fn from_expenses(expenses: &[Expense], display_currency: Currency) -> Self {
        let mut ron_paid_total = 0.0;
        let mut jin_paid_total = 0.0;

        for expense in expenses {
            let converted = convert(expense.amount, expense.currency, display_currency);

            match expense.paid_by {
                Participant::Ron => ron_paid_total += converted,
                Participant::Jin => jin_paid_total += converted,
            }
        }

        let total = ron_paid_total + jin_paid_total;
        let net_balance = total / 2.0 - ron_paid_total;

        Self {
            display_currency,
            ron_paid_total,
            jin_paid_total,
            total,
            net_balance,
        }
    }

    /// The converted sum of everything `participant` fronted.
    pub fn paid_total(&self, participant: Participant) -> f64 {
        match participant {
            Participant::Ron => self.ron_paid_total,
            Participant::Jin => self.jin_paid_total,
        }
    }

    /// How much `participant` still owes the other member: half the combined
    /// total minus what they already fronted.
    ///
    /// Swapping the participant negates the result.
    pub fn net_owed_by(&self, participant: Participant) -> f64 {
        self.total / 2.0 - self.paid_total(participant)
    }

    /// Resolve the net balance into who should pay whom.
    ///
    /// The sign-to-payer mapping is fixed: it does not depend on which
    /// participant the UI currently designates as the viewer.
    pub fn settlement(&self) -> Settlement {
        if self.net_balance.abs() < SETTLED_TOLERANCE {
            return Settlement::Settled;
        }

        let debtor = if self.net_balance > 0.0 {
            Participant::Ron
        } else {
            Participant::Jin
        };

        Settlement::Owes {
            debtor,
            creditor: debtor.other(),
            amount: self.net_balance.abs(),
        }
    }
}

/// The outcome of the two-person balance calculation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Settlement {
    /// The net balance is within [SETTLED_TOLERANCE] of zero.
    Settled,
    /// One member should pay the other.
    Owes {
        /// Who should pay.
        debtor: Participant,
        /// Who should receive the payment.
        creditor: Participant,
        /// How much, in the display currency the summary was computed in.
        amount: f64,
    },
}

impl Settlement {
    /// A plain-English label: "settled" or "X should pay Y".
    pub fn label(&self) -> String {
        match self {
            Settlement::Settled => "settled".to_string(),
            Settlement::Owes {
                debtor, creditor, ..
            } => format!("{debtor} should pay {creditor}"),
        }
    }
}

/// The signed half-share of a single expense for one participant, converted
/// to `display_currency`.
///
/// The payer fronted the whole amount, so their share is positive (they are
/// owed half back); the other member's share is negative (they owe half).
pub fn split_share(expense: &Expense, participant: Participant, display_currency: Currency) -> f64 {
    let converted_half = convert(expense.amount / 2.0, expense.currency, display_currency);

    if expense.paid_by == participant {
        converted_half
    } else {
        -converted_half
    }
}

#[cfg(test)]
mod ledger_tests {
    use time::macros::date;

    use crate::models::{CURRENCIES, Category, Currency, Expense, PARTICIPANTS, Participant};

    use super::{BalanceSummary, SETTLED_TOLERANCE, Settlement, split_share};

    fn expense(amount: f64, currency: Currency, paid_by: Participant, is_paid: bool) -> Expense {
        Expense {
            id: format!("{paid_by}-{amount}"),
            description: "test expense".to_string(),
            amount,
            currency,
            paid_by,
            category: Category::Other,
            date: date!(2026 - 02 - 14),
            is_paid,
        }
    }

    #[test]
    fn totals_sum_to_the_combined_total() {
        let expenses = vec![
            expense(3500.0, Currency::Yen, Participant::Ron, false),
            expense(45_000.0, Currency::Won, Participant::Jin, true),
            expense(500.0, Currency::Twd, Participant::Ron, false),
            expense(8200.0, Currency::Yen, Participant::Jin, false),
        ];

        for display in CURRENCIES {
            let summary = BalanceSummary::from_expenses(&expenses, display);

            let participant_sum = summary.ron_paid_total + summary.jin_paid_total;
            assert!(
                (participant_sum - summary.total).abs() < 1e-9,
                "per-person totals {participant_sum} do not sum to {} in {display}",
                summary.total
            );
        }
    }

    #[test]
    fn worked_example_from_a_single_expense() {
        let expenses = vec![expense(1000.0, Currency::Twd, Participant::Ron, false)];

        let summary = BalanceSummary::from_expenses(&expenses, Currency::Twd);

        assert_eq!(summary.ron_paid_total, 1000.0);
        assert_eq!(summary.jin_paid_total, 0.0);
        // Ron fronted everything, so the net is negative: Jin owes Ron.
        assert_eq!(summary.net_balance, -500.0);
        assert_eq!(
            summary.settlement(),
            Settlement::Owes {
                debtor: Participant::Jin,
                creditor: Participant::Ron,
                amount: 500.0,
            }
        );
    }

    #[test]
    fn swapping_participants_negates_the_net() {
        let expenses = vec![
            expense(3500.0, Currency::Yen, Participant::Ron, false),
            expense(45_000.0, Currency::Won, Participant::Jin, true),
            expense(8200.0, Currency::Yen, Participant::Jin, false),
        ];

        let summary = BalanceSummary::from_expenses(&expenses, Currency::Yen);

        assert!(
            (summary.net_owed_by(Participant::Ron) + summary.net_owed_by(Participant::Jin)).abs()
                < 1e-9
        );
        assert_eq!(summary.net_balance, summary.net_owed_by(Participant::Ron));
    }

    #[test]
    fn paid_flag_does_not_affect_the_balance() {
        let unpaid = vec![
            expense(1000.0, Currency::Yen, Participant::Ron, false),
            expense(400.0, Currency::Yen, Participant::Jin, false),
        ];
        let paid = vec![
            expense(1000.0, Currency::Yen, Participant::Ron, true),
            expense(400.0, Currency::Yen, Participant::Jin, true),
        ];

        let unpaid_summary = BalanceSummary::from_expenses(&unpaid, Currency::Yen);
        let paid_summary = BalanceSummary::from_expenses(&paid, Currency::Yen);

        assert_eq!(unpaid_summary.net_balance, paid_summary.net_balance);
    }

    #[test]
    fn near_zero_balance_is_settled_regardless_of_sign() {
        for amount in [1000.0, 1000.9] {
            let expenses = vec![
                expense(amount, Currency::Yen, Participant::Ron, false),
                expense(1000.5, Currency::Yen, Participant::Jin, false),
            ];

            let summary = BalanceSummary::from_expenses(&expenses, Currency::Yen);

            assert!(summary.net_balance.abs() < SETTLED_TOLERANCE);
            assert_eq!(summary.settlement(), Settlement::Settled);
            assert_eq!(summary.settlement().label(), "settled");
        }
    }

    #[test]
    fn positive_net_means_ron_pays() {
        let expenses = vec![expense(2000.0, Currency::Yen, Participant::Jin, false)];

        let summary = BalanceSummary::from_expenses(&expenses, Currency::Yen);

        assert_eq!(summary.net_balance, 1000.0);
        assert_eq!(
            summary.settlement(),
            Settlement::Owes {
                debtor: Participant::Ron,
                creditor: Participant::Jin,
                amount: 1000.0,
            }
        );
        assert_eq!(summary.settlement().label(), "Ron should pay Jin");
    }

    #[test]
    fn split_share_is_positive_for_the_payer() {
        let item = expense(1000.0, Currency::Yen, Participant::Ron, false);

        assert_eq!(split_share(&item, Participant::Ron, Currency::Yen), 500.0);
        assert_eq!(split_share(&item, Participant::Jin, Currency::Yen), -500.0);
    }

    #[test]
    fn split_share_converts_to_the_display_currency() {
        let item = expense(1000.0, Currency::Yen, Participant::Jin, false);

        // 500 yen at 9.2 won per yen.
        assert_eq!(split_share(&item, Participant::Jin, Currency::Won), 4600.0);
        assert_eq!(split_share(&item, Participant::Ron, Currency::Won), -4600.0);
    }

    #[test]
    fn split_shares_of_both_participants_cancel_out() {
        let item = expense(777.0, Currency::Twd, Participant::Ron, true);

        for display in CURRENCIES {
            let sum: f64 = PARTICIPANTS
                .iter()
                .map(|&participant| split_share(&item, participant, display))
                .sum();

            assert!(sum.abs() < 1e-9);
        }
    }

    #[test]
    fn empty_ledger_is_settled() {
        let summary = BalanceSummary::from_expenses(&[], Currency::Yen);

        assert_eq!(summary.total, 0.0);
        assert_eq!(summary.settlement(), Settlement::Settled);
    }
}
