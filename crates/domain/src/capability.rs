use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

bitflags! {
    /// Coarse elevated-permission flags resolved from an actor's roles.
    ///
    /// Bit positions follow the chat platform's permission integer so role
    /// payloads can be passed through without translation.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct Capabilities: u64 {
        /// May kick members.
        const KICK_MEMBERS = 1 << 1;
        /// May ban members.
        const BAN_MEMBERS = 1 << 2;
        /// Administrative override.
        const ADMINISTRATOR = 1 << 3;
        /// May create, edit and delete channels.
        const MANAGE_CHANNELS = 1 << 4;
        /// May manage tenant-wide settings.
        const MANAGE_GUILD = 1 << 5;
        /// May delete other members' messages.
        const MANAGE_MESSAGES = 1 << 13;
        /// May edit roles below their own.
        const MANAGE_ROLES = 1 << 28;
        /// May time out members.
        const MODERATE_MEMBERS = 1 << 40;

        // Platform bits this service does not name are carried through.
        const _ = !0;
    }
}

impl Capabilities {
    /// No capability bits set.
    pub const NONE: Self = Self::empty();

    /// Capabilities that classify a holder as staff.
    pub const ELEVATED: Self = Self::ADMINISTRATOR
        .union(Self::MANAGE_CHANNELS)
        .union(Self::MANAGE_GUILD)
        .union(Self::BAN_MEMBERS)
        .union(Self::KICK_MEMBERS)
        .union(Self::MODERATE_MEMBERS);

    /// Capabilities that grant settings management and ticket deletion.
    pub const ADMINISTRATIVE: Self = Self::ADMINISTRATOR.union(Self::MANAGE_GUILD);

    /// Returns whether the bitset holds any elevated capability.
    #[must_use]
    pub const fn is_elevated(self) -> bool {
        self.intersects(Self::ELEVATED)
    }

    /// Returns whether the bitset holds an administrative capability.
    #[must_use]
    pub const fn is_administrative(self) -> bool {
        self.intersects(Self::ADMINISTRATIVE)
    }
}

impl Serialize for Capabilities {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(self.bits())
    }
}

impl<'de> Deserialize<'de> for Capabilities {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        u64::deserialize(deserializer).map(Self::from_bits_retain)
    }
}
