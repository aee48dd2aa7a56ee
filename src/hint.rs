//! # hint
//!
//! memory prefetch hint for bodies that suspend right after touching memory
//!
//! a body that chases pointers through a large table can issue a prefetch for
//! the next address and suspend. while the other computations of a round run,
//! the cache line arrives, and the next step finds it ready.
//!

cfg_if::cfg_if! {
    if #[cfg(all(target_arch = "x86_64", target_feature = "sse"))] {
        /// request the cache line holding `ptr` for reading, with no temporal locality
        ///
        /// a prefetch never faults, any address is fine
        #[inline(always)]
        pub fn prefetch<T>(ptr: *const T) {
            use std::arch::x86_64::{_mm_prefetch, _MM_HINT_NTA};
            #[allow(unused_unsafe)]
            unsafe {
                _mm_prefetch::<_MM_HINT_NTA>(ptr as *const i8)
            }
        }
    } else if #[cfg(target_arch = "aarch64")] {
        /// request the cache line holding `ptr` for reading, with no temporal locality
        ///
        /// a prefetch never faults, any address is fine
        #[inline(always)]
        pub fn prefetch<T>(ptr: *const T) {
            unsafe {
                std::arch::asm!(
                    "prfm pldl1strm, [{0}]",
                    in(reg) ptr,
                    options(nostack, readonly, preserves_flags)
                )
            }
        }
    } else {
        /// request the cache line holding `ptr` for reading
        ///
        /// no prefetch instruction is used on this target
        #[inline(always)]
        pub fn prefetch<T>(ptr: *const T) {
            let _ = ptr;
        }
    }
}
