//! Status line and wallet display values.

/// One-line message shown under the board. May contain `\n` for extra lines.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StatusMessage {
    message: String,
}

impl StatusMessage {
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.message.split('\n')
    }

    pub fn set(&mut self, message: impl Into<String>) {
        self.message = message.into();
    }

    pub fn clear(&mut self) {
        self.message.clear();
    }
}

/// Read-only bet and holdings figures for display. No balance bookkeeping
/// happens here.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Wallet {
    current_bet: u64,
    holdings: u64,
}

impl Wallet {
    pub const fn new(holdings: u64) -> Self {
        Self {
            current_bet: 0,
            holdings,
        }
    }

    pub fn current_bet(&self) -> u64 {
        self.current_bet
    }

    pub fn holdings(&self) -> u64 {
        self.holdings
    }

    pub(crate) fn set_current_bet(&mut self, current_bet: u64) {
        self.current_bet = current_bet;
    }

    pub fn lines(&self) -> [String; 2] {
        [
            format!("Bet: {}", self.current_bet),
            format!("Holding: {}", self.holdings),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_lines() {
        let mut status = StatusMessage::default();
        assert_eq!(status.lines().collect::<Vec<_>>(), vec![""]);
        status.set("Ball landed on 11\n2 winning bets");
        assert_eq!(
            status.lines().collect::<Vec<_>>(),
            vec!["Ball landed on 11", "2 winning bets"]
        );
        status.clear();
        assert_eq!(status.message(), "");
    }

    #[test]
    fn test_wallet_lines() {
        let mut wallet = Wallet::new(1000);
        wallet.set_current_bet(60);
        assert_eq!(wallet.lines(), ["Bet: 60".to_string(), "Holding: 1000".to_string()]);
    }
}
