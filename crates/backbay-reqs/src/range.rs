use backbay_ruleset::named_enum;

named_enum! {
    /// Scope over which a requirement's existential test runs, from a single
    /// tile out to the whole world. Declaration order is the widening order.
    pub enum ReqRange {
        Local => "Local",
        CAdjacent => "CAdjacent",
        Adjacent => "Adjacent",
        City => "City",
        TradeRoute => "Traderoute",
        Continent => "Continent",
        Player => "Player",
        Team => "Team",
        Alliance => "Alliance",
        World => "World",
    }
}

impl ReqRange {
    /// Ranges scoped to players rather than places.
    pub fn is_social(self) -> bool {
        self >= ReqRange::Player
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranges_widen_in_declaration_order() {
        assert!(ReqRange::Local < ReqRange::CAdjacent);
        assert!(ReqRange::CAdjacent < ReqRange::Adjacent);
        assert!(ReqRange::Continent < ReqRange::Player);
        assert!(ReqRange::Alliance < ReqRange::World);
        assert_eq!(ReqRange::by_name("traderoute"), Some(ReqRange::TradeRoute));
        assert!(ReqRange::Team.is_social());
        assert!(!ReqRange::City.is_social());
    }
}
