/// Result of a claim attempt. Both variants are normal outcomes, not
/// errors: an empty-handed user is expected traffic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimOutcome {
    /// The pending entitlement was delivered, removed from the ledger and
    /// logged. `amount` and `item` are what the grant actually carried.
    Claimed { amount: u32, item: String },
    /// No pending entitlement existed; nothing changed anywhere.
    NothingToClaim,
}
