// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// This layer orchestrates all the other layers to accomplish
// a specific goal (preprocessing a corpus or inspecting one).
//
// Rules for this layer:
//   - No tokenization or vocabulary logic here
//   - No UI or printing here (that's Layer 1)
//   - No direct file access (that's Layer 4 and 6)
//   - Only workflow coordination
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

// The full preprocessing workflow
pub mod prepro_use_case;

// Length distributions of one split
pub mod stats_use_case;
