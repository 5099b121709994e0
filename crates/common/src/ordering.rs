use std::cmp::Ordering;

use crate::models::Account;

/// Display order of the account table.
///
/// Accounts usable on both platforms come first, then accounts usable on
/// either one, then the rest. Within each group the least used account wins,
/// ties broken by username.
pub fn compare_accounts(a: &Account, b: &Account) -> Ordering {
    let both = |acc: &Account| acc.gpt_status && acc.midjourney_status;
    let either = |acc: &Account| acc.gpt_status || acc.midjourney_status;

    both(b)
        .cmp(&both(a))
        .then_with(|| either(b).cmp(&either(a)))
        .then_with(|| a.usage_count.cmp(&b.usage_count))
        .then_with(|| a.username.cmp(&b.username))
}

pub fn sort_accounts(accounts: &mut [Account]) {
    accounts.sort_by(compare_accounts);
}
