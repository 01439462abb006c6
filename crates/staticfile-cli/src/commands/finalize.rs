use staticfile_build::Finalizer;
use staticfile_core::Report;
use std::path::Path;

pub fn finalize(build_dir: &Path, dep_dir: Option<&Path>) -> anyhow::Result<()> {
    let mut finalizer = Finalizer::new(build_dir);
    if let Some(dep_dir) = dep_dir {
        finalizer = finalizer.with_dep_dir(dep_dir);
    }
    tracing::info!(build_dir = %build_dir.display(), "finalizing");

    let mut report = Report::new();
    let result = staticfile_build::finalize::run(&finalizer, &mut report);

    // Print what ran even when a stage failed.
    print!("{report}");
    result?;

    println!("-----> Staticfile app ready in {}", build_dir.display());
    Ok(())
}
