//! Translator: flattens an expression tree into program-order commands.

use crate::lang::Expr;

use super::command::Command;

/// Translate a tree into its statements, depth-first and left to right.
///
/// Uses an explicit work stack, so `&&` chains of any length translate
/// without recursion.
pub fn translate(tree: &Expr) -> Vec<Command<'_>> {
    let mut commands = Vec::new();
    let mut stack = vec![tree];

    while let Some(node) = stack.pop() {
        let command = match node {
            Expr::Sequence(left, right) => {
                stack.push(right);
                stack.push(left);
                continue;
            }
            Expr::Error(err) => Command::SyntaxError(err),
            Expr::Quit => Command::Quit,
            Expr::Stop => Command::Stop,
            Expr::Let(name, value) => Command::Let(name, value),
            Expr::Ident(name) => Command::Eval(name),
            Expr::Help => Command::Help,
            Expr::Echo(name) => Command::Echo(name),
            Expr::Rotate(angle) => Command::Rotate(angle),
            Expr::Move(distance) => Command::Move(distance),
            Expr::Buy(name, count) => Command::Buy(name, count),
            Expr::Sell(name, count) => Command::Sell(name, count),
            Expr::Inventory => Command::Inventory,
            Expr::MarketPrices => Command::MarketPrices,
            Expr::CityPrices => Command::CityPrices,
            Expr::Landmark | Expr::Int(_) => Command::Unrecognized(node),
        };
        commands.push(command);
    }

    commands
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::{parse_line, Identifier};

    fn id(name: &str) -> Identifier {
        Identifier::parse(name).unwrap()
    }

    #[test]
    fn single_statement() {
        let tree = parse_line("move 5").unwrap();
        let commands = translate(&tree);
        assert_eq!(commands, vec![Command::Move(&Expr::Int(5))]);
    }

    #[test]
    fn chain_is_flattened_in_program_order() {
        let tree = parse_line("move 1 && rotate 2 && stop").unwrap();
        let commands = translate(&tree);
        assert_eq!(
            commands,
            vec![
                Command::Move(&Expr::Int(1)),
                Command::Rotate(&Expr::Int(2)),
                Command::Stop
            ]
        );
    }

    #[test]
    fn left_nested_sequences_keep_order() {
        let tree = Expr::Sequence(
            Box::new(Expr::Sequence(Box::new(Expr::Quit), Box::new(Expr::Help))),
            Box::new(Expr::Stop),
        );
        assert_eq!(
            translate(&tree),
            vec![Command::Quit, Command::Help, Command::Stop]
        );
    }

    #[test]
    fn arguments_stay_unevaluated() {
        let tree = parse_line("buy wheat n").unwrap();
        let x = id("wheat");
        let n = Expr::Ident(id("n"));
        assert_eq!(translate(&tree), vec![Command::Buy(&x, &n)]);
    }

    #[test]
    fn bare_identifier_becomes_eval() {
        let tree = parse_line("x").unwrap();
        let x = id("x");
        assert_eq!(translate(&tree), vec![Command::Eval(&x)]);
    }

    #[test]
    fn errors_are_carried_not_dropped() {
        let tree = parse_line("let = 1 && inventory").unwrap();
        let commands = translate(&tree);
        assert_eq!(commands.len(), 2);
        assert!(matches!(commands[0], Command::SyntaxError(err) if err.message == "expected identifier"));
        assert_eq!(commands[1], Command::Inventory);
    }

    #[test]
    fn landmark_and_literals_are_unrecognized() {
        let tree = parse_line("landmark && 7").unwrap();
        let commands = translate(&tree);
        assert_eq!(
            commands,
            vec![
                Command::Unrecognized(&Expr::Landmark),
                Command::Unrecognized(&Expr::Int(7))
            ]
        );
    }
}
