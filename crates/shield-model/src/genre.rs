//! # Genres
//!
//! A genre tags the shape of a value. For ticket items and whitelist
//! entries it also selects the one chain the value is validated against:
//! an item declared `ipv4` must be an IPv4 address, even if it would pass as
//! an FQDN.

use shield_core::RuleChain;

use crate::catalog;

closed_set! {
    /// Kind of ticket.
    pub enum TicketGenre("ticket genre") {
        /// A blocking order.
        Blocking => "blocking",
        /// A correction of a previous blocking order.
        Error => "error",
    }
}

closed_set! {
    /// Shape of a ticket item value.
    pub enum TicketItemGenre("ticket item genre") {
        /// Fully qualified domain name.
        Fqdn => "fqdn",
        /// IPv4 address.
        Ipv4 => "ipv4",
        /// IPv6 address.
        Ipv6 => "ipv6",
    }
}

impl TicketItemGenre {
    /// Chain a value of this genre must pass.
    pub fn chain(&self) -> &'static RuleChain {
        match self {
            Self::Fqdn => &catalog::ticket::FQDN,
            Self::Ipv4 => &catalog::ticket::IPV4,
            Self::Ipv6 => &catalog::ticket::IPV6,
        }
    }
}

closed_set! {
    /// Shape of a whitelist entry value.
    pub enum WhitelistGenre("whitelist genre") {
        /// Fully qualified domain name; carries a registrar.
        Fqdn => "fqdn",
        /// IPv4 address; carries an AS code.
        Ipv4 => "ipv4",
        /// IPv6 address; carries an AS code.
        Ipv6 => "ipv6",
        /// IPv4 network; carries an AS code.
        CidrIpv4 => "cidr_ipv4",
        /// IPv6 network; carries an AS code.
        CidrIpv6 => "cidr_ipv6",
    }
}

impl WhitelistGenre {
    /// Chain a value of this genre must pass.
    pub fn chain(&self) -> &'static RuleChain {
        match self {
            Self::Fqdn => &catalog::ticket::FQDN,
            Self::Ipv4 => &catalog::ticket::IPV4,
            Self::Ipv6 => &catalog::ticket::IPV6,
            Self::CidrIpv4 => &catalog::whitelist::CIDR_IPV4,
            Self::CidrIpv6 => &catalog::whitelist::CIDR_IPV6,
        }
    }

    /// Domain entries name a registrar; address entries name an AS.
    pub fn needs_registrar(&self) -> bool {
        matches!(self, Self::Fqdn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shield_core::Input;

    #[test]
    fn genre_chains_are_strict() {
        assert!(TicketItemGenre::Ipv4.chain().check(Input::Text("8.8.8.8")).is_valid());
        assert!(!TicketItemGenre::Ipv4.chain().check(Input::Text("example.com")).is_valid());
        assert!(!TicketItemGenre::Fqdn.chain().check(Input::Text("8.8.8.8")).is_valid());
        assert!(WhitelistGenre::CidrIpv6.chain().check(Input::Text("2001:db8::/48")).is_valid());
        assert!(!WhitelistGenre::CidrIpv4.chain().check(Input::Text("10.0.0.1")).is_valid());
    }

    #[test]
    fn only_fqdn_needs_registrar() {
        let needing: Vec<_> = WhitelistGenre::all().iter().filter(|g| g.needs_registrar()).collect();
        assert_eq!(needing, vec![&WhitelistGenre::Fqdn]);
    }

    #[test]
    fn parse_rejects_other_genres() {
        assert!("cidr_ipv4".parse::<TicketItemGenre>().is_err());
        assert_eq!("cidr_ipv4".parse::<WhitelistGenre>().unwrap(), WhitelistGenre::CidrIpv4);
        let err = "FQDN".parse::<TicketItemGenre>().unwrap_err();
        assert_eq!(err.kind, "ticket item genre");
        assert_eq!("error".parse::<TicketGenre>().unwrap(), TicketGenre::Error);
    }
}
