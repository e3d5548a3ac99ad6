pub mod duplicates;
pub mod sidecar;

/// A sidecar is named `<base file name><suffix>`; the suffix alone is not a sidecar.
pub fn is_sidecar(name: &str, sidecar_suffix: &str) -> bool {
    name.len() > sidecar_suffix.len() && name.ends_with(sidecar_suffix)
}
