// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// This layer orchestrates all the other layers to accomplish
// a specific goal (preparing or inspecting a dataset).
//
// Rules for this layer:
//   - No feature math here (that's Layer 5)
//   - No printing here (that's Layer 1)
//   - No direct file parsing (that's Layer 4 and 6)
//   - Only workflow coordination
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

// The dataset preparation workflow
pub mod prepare_use_case;

// Summaries of generated tables
pub mod inspect_use_case;
