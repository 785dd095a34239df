//! Mechanism commands: fully resolved instructions for the actuator.

use std::fmt;

use crate::lang::Identifier;

/// A concrete instruction for the external actuator. Every argument has
/// already been evaluated to an integer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MechCommand {
    Stop,
    Rotate(i64),
    Move(i64),
    Buy { commodity: Identifier, count: i64 },
    Sell { commodity: Identifier, count: i64 },
    Inventory,
    MarketPrices,
    CityPrices,
}

/// One line of the actuator protocol.
impl fmt::Display for MechCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MechCommand::Stop => f.write_str("stop"),
            MechCommand::Rotate(angle) => write!(f, "rotate {angle}"),
            MechCommand::Move(distance) => write!(f, "move {distance}"),
            MechCommand::Buy { commodity, count } => write!(f, "buy {commodity} {count}"),
            MechCommand::Sell { commodity, count } => write!(f, "sell {commodity} {count}"),
            MechCommand::Inventory => f.write_str("inventory"),
            MechCommand::MarketPrices => f.write_str("marketPrices"),
            MechCommand::CityPrices => f.write_str("cityPrices"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protocol_lines() {
        let wheat = Identifier::parse("wheat").unwrap();
        assert_eq!(MechCommand::Stop.to_string(), "stop");
        assert_eq!(MechCommand::Rotate(-90).to_string(), "rotate -90");
        assert_eq!(MechCommand::Move(12).to_string(), "move 12");
        assert_eq!(
            MechCommand::Buy {
                commodity: wheat.clone(),
                count: 3
            }
            .to_string(),
            "buy wheat 3"
        );
        assert_eq!(
            MechCommand::Sell {
                commodity: wheat,
                count: 1
            }
            .to_string(),
            "sell wheat 1"
        );
        assert_eq!(MechCommand::MarketPrices.to_string(), "marketPrices");
        assert_eq!(MechCommand::CityPrices.to_string(), "cityPrices");
    }
}
