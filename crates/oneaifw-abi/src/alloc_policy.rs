//! Process allocator selection (spec §5: "a single process allocator per
//! build — page allocator on WASM, a general allocator on native debug, an
//! SMP-aware allocator on native release").
//!
//! `wasm32` and native debug builds keep `std::alloc::System` (the
//! implicit default, nothing to override). Native release builds with the
//! `mimalloc` feature enabled swap in `mimalloc`; this is an enrichment
//! import beyond what the teacher pulls in directly, justified in
//! `DESIGN.md`.

#[cfg(all(not(target_arch = "wasm32"), not(debug_assertions), feature = "mimalloc"))]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;
