//! Helper macro for ABI function generation.
//!
//! Adapted from the teacher's `abi_fn!`: generates a `#[no_mangle] pub
//! unsafe extern "C" fn` with the body wrapped in the required `unsafe`
//! block, so call sites read like safe functions with an `unsafe fn`
//! signature instead of every statement needing its own `unsafe { ... }`.

macro_rules! oneaifw_abi_fn {
    (
        $(#[$meta:meta])*
        fn $name:ident( $($arg:ident : $argty:ty),* $(,)? ) -> $ret:ty
        $body:block
    ) => {
        $(#[$meta])*
        #[unsafe(no_mangle)]
        pub unsafe extern "C" fn $name( $($arg : $argty),* ) -> $ret {
            unsafe { $body }
        }
    };

    (
        $(#[$meta:meta])*
        fn $name:ident( $($arg:ident : $argty:ty),* $(,)? )
        $body:block
    ) => {
        $(#[$meta])*
        #[unsafe(no_mangle)]
        pub unsafe extern "C" fn $name( $($arg : $argty),* ) {
            unsafe { $body }
        }
    };
}

pub(crate) use oneaifw_abi_fn;
