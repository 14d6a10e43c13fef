use std::fmt::{Debug, Formatter};
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::{Builder, JoinHandle};

/// The placeholder substituted with the thread number in numbered patterns.
pub const NUMBER_PLACEHOLDER: &str = "%d";

/// Returns a [`NamedThreadFactory`] that numbers its threads: the first `%d` in
/// `pattern` is replaced with `0`, `1`, `2`, … in the order the names are
/// handed out.
///
/// Shorthand for [`NamedThreadFactory::numbered`].
pub fn create_named_thread_factory(pattern: impl AsRef<str>) -> NamedThreadFactory {
    NamedThreadFactory::numbered(pattern)
}

/// Returns a [`NamedThreadFactory`] that gives every thread the exact same
/// `name`, verbatim.
///
/// Shorthand for [`NamedThreadFactory::fixed`].
pub fn create_named_single_thread_factory(name: impl AsRef<str>) -> NamedThreadFactory {
    NamedThreadFactory::fixed(name)
}

/// Produces threads with deterministic, human-readable names.
///
/// A factory either hands out a fixed literal name, or numbers its threads
/// from a template (see [`ThreadNameSpec`]). The counter of a numbered factory
/// starts at `0` and belongs to the factory: clones of a factory share it, but
/// two separately created factories never do.
///
/// Name allocation is a single atomic increment, so concurrent callers always
/// receive distinct, contiguous numbers.
///
/// ## Example
///
/// ```
/// use lastcall_core::NamedThreadFactory;
///
/// let factory = NamedThreadFactory::numbered("PoolThread-%d");
///
/// let first = factory.new_thread(|| 1);
/// let second = factory.new_thread(|| 2);
///
/// assert_eq!(first.name(), "PoolThread-0");
/// assert_eq!(second.name(), "PoolThread-1");
///
/// let handle = second.start().unwrap();
/// assert_eq!(handle.thread().name(), Some("PoolThread-1"));
/// assert_eq!(handle.join().unwrap(), 2);
/// ```
#[derive(Clone)]
pub struct NamedThreadFactory {
    spec: ThreadNameSpec,
    counter: Arc<AtomicU64>,
}

/// Describes how a [`NamedThreadFactory`] names its threads.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ThreadNameSpec {
    /// Every thread receives this exact name.
    Fixed(Arc<str>),

    /// Every thread receives `prefix`, the next number, and `suffix`.
    Numbered {
        /// Text before the placeholder.
        prefix: Arc<str>,
        /// Text after the placeholder.
        suffix: Arc<str>,
    },
}

impl ThreadNameSpec {
    /// Parses a numbered pattern. Only the first [`NUMBER_PLACEHOLDER`] is
    /// substituted; a pattern without one degrades to a fixed name.
    pub fn parse(pattern: &str) -> Self {
        match pattern.split_once(NUMBER_PLACEHOLDER) {
            Some((prefix, suffix)) => Self::Numbered {
                prefix: Arc::from(prefix),
                suffix: Arc::from(suffix),
            },
            None => Self::Fixed(Arc::from(pattern)),
        }
    }

    /// Renders the name for the given thread number. Fixed names ignore it.
    fn render(&self, number: u64) -> String {
        match self {
            Self::Fixed(name) => name.to_string(),
            Self::Numbered { prefix, suffix } => format!("{prefix}{number}{suffix}"),
        }
    }
}

impl NamedThreadFactory {
    /// Creates a factory that numbers its threads from `pattern`. See
    /// [`ThreadNameSpec::parse`].
    pub fn numbered(pattern: impl AsRef<str>) -> Self {
        Self::from_spec(ThreadNameSpec::parse(pattern.as_ref()))
    }

    /// Creates a factory that names every thread exactly `name`. A `%d` in the
    /// name is kept as is.
    pub fn fixed(name: impl AsRef<str>) -> Self {
        Self::from_spec(ThreadNameSpec::Fixed(Arc::from(name.as_ref())))
    }

    /// Creates a factory from an explicit [`ThreadNameSpec`].
    pub fn from_spec(spec: ThreadNameSpec) -> Self {
        Self {
            spec,
            counter: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Returns the naming scheme of this factory.
    pub fn spec(&self) -> &ThreadNameSpec {
        &self.spec
    }

    /// Allocates the next thread name without creating a thread.
    ///
    /// This is the hook for thread pools that spawn their own threads, e.g.
    /// `tokio::runtime::Builder::thread_name_fn`.
    pub fn next_name(&self) -> String {
        match self.spec {
            ThreadNameSpec::Fixed(_) => self.spec.render(0),
            ThreadNameSpec::Numbered { .. } => {
                let number = self.counter.fetch_add(1, Ordering::Relaxed);

                self.spec.render(number)
            }
        }
    }

    /// Returns a named, not yet started thread that will run `work`.
    pub fn new_thread<F, T>(&self, work: F) -> UnstartedThread<F>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        UnstartedThread {
            name: self.next_name(),
            stack_size: None,
            work,
        }
    }

    /// Creates a named thread running `work` and starts it right away.
    pub fn spawn<F, T>(&self, work: F) -> io::Result<JoinHandle<T>>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        self.new_thread(work).start()
    }
}

impl Debug for NamedThreadFactory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NamedThreadFactory")
            .field("spec", &self.spec)
            .field("next", &self.counter.load(Ordering::Relaxed))
            .finish()
    }
}

/// A thread that has been named by a [`NamedThreadFactory`] but not started.
pub struct UnstartedThread<F> {
    name: String,
    stack_size: Option<usize>,
    work: F,
}

impl<F, T> UnstartedThread<F>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    /// Reports the name this thread will run under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sets the stack size of this thread, in bytes.
    pub fn stack_size(self, size: usize) -> Self {
        Self {
            stack_size: Some(size),
            ..self
        }
    }

    /// Starts this thread.
    pub fn start(self) -> io::Result<JoinHandle<T>> {
        let mut builder = Builder::new().name(self.name);

        if let Some(size) = self.stack_size {
            builder = builder.stack_size(size);
        }

        builder.spawn(self.work)
    }
}

impl<F> Debug for UnstartedThread<F> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnstartedThread")
            .field("name", &self.name)
            .field("stack_size", &self.stack_size)
            .finish_non_exhaustive()
    }
}
