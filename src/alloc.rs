//! Allocator Configuration
//!
//! mimalloc is the global allocator when the `mimalloc` feature is on. With
//! `memory_tracking`, allocations go through a counting wrapper so the host
//! can ask how much memory conversions hold.

#[cfg(feature = "memory_tracking")]
mod tracking {
    use std::alloc::{GlobalAlloc, Layout};
    use std::sync::atomic::{AtomicUsize, Ordering};

    pub static LIVE_BYTES: AtomicUsize = AtomicUsize::new(0);
    pub static PEAK_BYTES: AtomicUsize = AtomicUsize::new(0);

    pub struct CountingAllocator;

    #[cfg(feature = "mimalloc")]
    static INNER: mimalloc::MiMalloc = mimalloc::MiMalloc;

    #[cfg(not(feature = "mimalloc"))]
    static INNER: std::alloc::System = std::alloc::System;

    unsafe impl GlobalAlloc for CountingAllocator {
        unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
            let ptr = INNER.alloc(layout);
            if !ptr.is_null() {
                let live = LIVE_BYTES.fetch_add(layout.size(), Ordering::Relaxed) + layout.size();
                PEAK_BYTES.fetch_max(live, Ordering::Relaxed);
            }
            ptr
        }

        unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
            LIVE_BYTES.fetch_sub(layout.size(), Ordering::Relaxed);
            INNER.dealloc(ptr, layout)
        }
    }
}

#[cfg(feature = "memory_tracking")]
#[global_allocator]
static GLOBAL: tracking::CountingAllocator = tracking::CountingAllocator;

#[cfg(all(feature = "mimalloc", not(feature = "memory_tracking")))]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

/// Bytes currently allocated. Always 0 without `memory_tracking`.
pub fn current_bytes() -> usize {
    #[cfg(feature = "memory_tracking")]
    {
        tracking::LIVE_BYTES.load(std::sync::atomic::Ordering::SeqCst)
    }
    #[cfg(not(feature = "memory_tracking"))]
    {
        0
    }
}

/// Highest value `current_bytes` has reached since the last reset
pub fn peak_bytes() -> usize {
    #[cfg(feature = "memory_tracking")]
    {
        tracking::PEAK_BYTES.load(std::sync::atomic::Ordering::SeqCst)
    }
    #[cfg(not(feature = "memory_tracking"))]
    {
        0
    }
}

/// Reset the peak to the current level. Returns `(current, previous_peak)`.
pub fn reset_peak() -> (usize, usize) {
    #[cfg(feature = "memory_tracking")]
    {
        use std::sync::atomic::Ordering;
        let current = tracking::LIVE_BYTES.load(Ordering::SeqCst);
        let peak = tracking::PEAK_BYTES.swap(current, Ordering::SeqCst);
        (current, peak)
    }
    #[cfg(not(feature = "memory_tracking"))]
    {
        (0, 0)
    }
}

#[cfg(all(test, feature = "memory_tracking"))]
mod tests {
    use super::*;

    #[test]
    fn test_peak_covers_large_conversion() {
        let doc: String = (0..2000).map(|i| format!("<item n=\"{}\">value {}</item>", i, i)).collect();
        let doc = format!("<root>{}</root>", doc);

        let value = crate::parse(&doc).unwrap();
        // Other tests allocate concurrently, so only a lower bound holds
        assert!(peak_bytes() >= doc.len());
        drop(value);
    }
}
