//! Fixed table of button cells, addressed by [`ButtonId`].
//!
//! The bank is the single owner of every [`ButtonState`]; buttons and
//! combination links refer to slots by index, never by owning reference.
//!
//! ```
//! use edgeclick::button::{ButtonBank, ButtonId};
//!
//! static BUTTONS: ButtonBank<2> = ButtonBank::new();
//! const MODE: ButtonId = ButtonId::new(0);
//!
//! assert!(BUTTONS.get(MODE).is_some());
//! ```

use core::fmt;
use core::ops::Deref;

use serde::{Deserialize, Serialize};

use super::state::ButtonState;

/// Index of a button slot in its bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ButtonId(u8);

impl ButtonId {
    pub const fn new(index: u8) -> Self {
        Self(index)
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ButtonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// `N` statically allocated button cells.
pub struct ButtonBank<const N: usize> {
    slots: [ButtonState; N],
}

impl<const N: usize> Default for ButtonBank<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> ButtonBank<N> {
    pub const fn new() -> Self {
        assert!(N <= u8::MAX as usize, "a bank holds at most 255 buttons");
        Self {
            slots: [const { ButtonState::new() }; N],
        }
    }

    pub fn get(&self, id: ButtonId) -> Option<&ButtonState> {
        self.slots.get(id.index())
    }

    pub fn as_slice(&self) -> &[ButtonState] {
        &self.slots
    }

    /// Ids of every slot, in order.
    pub fn ids(&self) -> impl Iterator<Item = ButtonId> {
        (0..N as u8).map(ButtonId::new)
    }
}

impl<const N: usize> Deref for ButtonBank<N> {
    type Target = [ButtonState];

    fn deref(&self) -> &Self::Target {
        &self.slots
    }
}
