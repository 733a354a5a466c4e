use anyhow::{bail, Result};
use ingot_core::{identity, page_identity, Namespace};

/// Print the identity of `path`
pub fn execute(namespace: Namespace, path: &str, sub_page: Option<&str>) -> Result<()> {
    println!("{}", derive(namespace, path, sub_page)?);
    Ok(())
}

fn derive(namespace: Namespace, path: &str, sub_page: Option<&str>) -> Result<String> {
    match (namespace, sub_page) {
        (Namespace::Page, sub_page) => Ok(page_identity(path, sub_page)),
        (_, None) => Ok(identity(namespace, path)),
        (other, Some(_)) => bail!("--sub-page only applies to the page namespace, not {other}"),
    }
}
