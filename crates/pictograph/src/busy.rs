/// Something that can show the user a long operation is running, such as a
/// wait cursor.
pub trait BusyIndicator {
    fn acquire(&self);
    fn release(&self);
}

/// Holds the indicator for its own lifetime, so it is released on every exit
/// path including an unwinding panic.
pub struct BusyGuard<'a> {
    indicator: Option<&'a dyn BusyIndicator>,
}

impl<'a> BusyGuard<'a> {
    pub fn acquire(indicator: Option<&'a dyn BusyIndicator>) -> Self {
        match indicator {
            Some(indicator) => indicator.acquire(),
            None => log::warn!("No busy indicator registered; running without one"),
        }
        Self { indicator }
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        if let Some(indicator) = self.indicator {
            indicator.release();
        }
    }
}
