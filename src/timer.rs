use core::{ops::Add, time::Duration};

/// Monotonic time since an epoch chosen by the application, usually boot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Uptime(Duration);

impl Uptime {
    pub const START: Uptime = Uptime(Duration::ZERO);

    pub const fn new(since_start: Duration) -> Self {
        Uptime(since_start)
    }

    pub const fn from_millis(millis: u64) -> Self {
        Uptime(Duration::from_millis(millis))
    }

    pub const fn from_micros(micros: u64) -> Self {
        Uptime(Duration::from_micros(micros))
    }

    pub const fn since_start(&self) -> Duration {
        self.0
    }

    /// Time left until `deadline`, zero once it has passed.
    pub fn until(&self, deadline: Uptime) -> Duration {
        deadline.0.saturating_sub(self.0)
    }
}

impl Add<Duration> for Uptime {
    type Output = Uptime;

    /// Saturates instead of overflowing.
    fn add(self, rhs: Duration) -> Uptime {
        Uptime(self.0.saturating_add(rhs))
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Uptime {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{=u64}ms", self.0.as_millis() as u64)
    }
}

/// A deferred task that fires at most once per arming. The owner advances it
/// from its run loop; nothing happens in the background.
#[derive(Debug, Clone, Copy, Default)]
pub struct OneShot {
    deadline: Option<Uptime>,
}

impl OneShot {
    pub const fn new() -> Self {
        OneShot { deadline: None }
    }

    /// Arms the task, replacing a previous deadline.
    pub fn schedule_at(&mut self, deadline: Uptime) {
        self.deadline = Some(deadline);
    }

    pub fn is_scheduled(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Uptime> {
        self.deadline
    }

    /// Disarms the task and returns its deadline if that has been reached.
    pub fn fire(&mut self, now: Uptime) -> Option<Uptime> {
        match self.deadline {
            Some(deadline) if now >= deadline => self.deadline.take(),
            _ => None,
        }
    }
}
