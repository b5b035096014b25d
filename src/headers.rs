//! Headers for the serialized structures.

use simple_sds::serialize::{Serializable, Serialize};

//-----------------------------------------------------------------------------

/// The fixed-size prefix of a serialized structure.
///
/// A header starts with a 32-bit magic tag and a 32-bit version number,
/// followed by a format-specific payload and 64 bits of binary flags.
/// The payload type describes the format through the [`Payload`] trait: which
/// tag to expect, which versions can be loaded, and which flags each version
/// accepts.
///
/// [`Header::validate`] checks a loaded header against the payload type and
/// reports the first problem it finds.
/// [`Header::update`] bumps a valid header to the latest version once the
/// version-specific parts of the data have been handled.
///
/// # Examples
///
/// ```
/// use gbwt_core::headers::{Header, Payload};
/// use simple_sds::serialize::Serialize;
///
/// #[derive(Copy, Clone, Default, PartialEq, Eq)]
/// struct Counts {
///     items: usize,
/// }
///
/// impl Payload for Counts {
///     const NAME: &'static str = "Counts";
///     const TAG: u32 = 0x12AB34CD;
///     const VERSION: u32 = 2;
///     const MIN_VERSION: u32 = 1;
///     const DEFAULT_FLAGS: u64 = 0;
///
///     fn update(&mut self) {}
///
///     fn mask(version: u32) -> u64 {
///         if version < 2 { 0 } else { 0x3 }
///     }
///
///     fn validate(_: &Header<Self>) -> Result<(), String> {
///         Ok(())
///     }
/// }
///
/// let mut header = Header::<Counts>::new();
/// assert_eq!(header.version(), 2);
/// assert_eq!(header.size_in_elements(), 3);
/// assert!(header.validate().is_ok());
///
/// header.set(0x2);
/// assert!(header.is_set(0x2));
/// header.unset(0x2);
/// assert!(!header.is_set(0x2));
///
/// // Flags outside the mask of the version are rejected.
/// header.set(0x4);
/// assert!(header.validate().is_err());
/// ```
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Header<T: Payload> {
    tag: u32,
    version: u32,
    payload: T,
    flags: u64,
}

impl<T: Payload> Header<T> {
    /// Creates a header with the latest version and default flags.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the version number stored in the header.
    #[inline]
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Bumps the header to the latest version.
    pub fn update(&mut self) {
        self.version = T::VERSION;
        self.payload.update()
    }

    /// Returns `true` if the given flag is set.
    #[inline]
    pub fn is_set(&self, flag: u64) -> bool {
        (self.flags & flag) != 0
    }

    /// Sets the given flag.
    #[inline]
    pub fn set(&mut self, flag: u64) {
        self.flags |= flag;
    }

    /// Clears the given flag.
    #[inline]
    pub fn unset(&mut self, flag: u64) {
        self.flags &= !flag;
    }

    /// Checks the tag, the version, and the flags, and returns a message
    /// describing the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        if self.tag != T::TAG {
            return Err(format!("{}: Unexpected tag {:#010X}", T::NAME, self.tag));
        }
        if self.version < T::MIN_VERSION || self.version > T::VERSION {
            return Err(format!(
                "{}: Unsupported version {} (supported: {} to {})",
                T::NAME, self.version, T::MIN_VERSION, T::VERSION
            ));
        }
        if (self.flags & !T::mask(self.version)) != 0 {
            return Err(format!("{}: Unknown flags {:#X} in version {}", T::NAME, self.flags, self.version));
        }
        T::validate(self)
    }

    /// Returns a reference to the payload.
    #[inline]
    pub fn payload(&self) -> &T {
        &self.payload
    }

    /// Returns a mutable reference to the payload.
    #[inline]
    pub fn payload_mut(&mut self) -> &mut T {
        &mut self.payload
    }
}

impl<T: Payload> Default for Header<T> {
    fn default() -> Self {
        Header {
            tag: T::TAG,
            version: T::VERSION,
            payload: T::default(),
            flags: T::DEFAULT_FLAGS,
        }
    }
}

impl<T: Payload> Serializable for Header<T> {}

//-----------------------------------------------------------------------------

/// Format description carried in the middle of a [`Header`].
///
/// Implementations must be `Copy` types whose layout is either empty or
/// `#[repr(C)]` with a size that is a multiple of 8 bytes, as the header is
/// serialized directly as words.
/// See [`Header`] for an example.
pub trait Payload: Copy + Eq + Default {
    /// Name used in error messages.
    const NAME: &'static str;

    /// Magic tag identifying the format.
    const TAG: u32;

    /// The latest version this implementation writes.
    const VERSION: u32;

    /// The oldest version this implementation can load.
    const MIN_VERSION: u32;

    /// Flags set in a newly created header.
    const DEFAULT_FLAGS: u64;

    /// Brings the version-specific parts of the payload up to date.
    fn update(&mut self);

    /// Returns the flags the given version accepts.
    fn mask(version: u32) -> u64;

    /// Runs format-specific checks beyond the tag, version, and flags.
    fn validate(header: &Header<Self>) -> Result<(), String>;
}

//-----------------------------------------------------------------------------

/// Payload of the metadata header: sequence statistics for the index.
#[repr(C)]
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq)]
pub struct MetadataPayload {
    /// Number of samples with sequences in the index.
    pub sample_count: usize,

    /// Number of haplotypes across the samples.
    pub haplotype_count: usize,

    /// Number of contigs in the underlying graph.
    pub contig_count: usize,
}

impl MetadataPayload {
    /// Structured path names are present.
    pub const FLAG_PATH_NAMES: u64 = 0x0001;

    /// A sample name dictionary is present.
    pub const FLAG_SAMPLE_NAMES: u64 = 0x0002;

    /// A contig name dictionary is present.
    pub const FLAG_CONTIG_NAMES: u64 = 0x0004;
}

impl Payload for MetadataPayload {
    const NAME: &'static str = "MetadataHeader";
    const TAG: u32 = 0x6B375E7A;
    const VERSION: u32 = 2;
    const MIN_VERSION: u32 = 1;
    const DEFAULT_FLAGS: u64 = 0;

    fn update(&mut self) {}

    fn mask(version: u32) -> u64 {
        match version {
            // The first version stored the counts only.
            1 => 0,
            _ => Self::FLAG_PATH_NAMES | Self::FLAG_SAMPLE_NAMES | Self::FLAG_CONTIG_NAMES,
        }
    }

    fn validate(_: &Header<Self>) -> Result<(), String> {
        Ok(())
    }
}

//-----------------------------------------------------------------------------


//-----------------------------------------------------------------------------
