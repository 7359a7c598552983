use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

const FRAMES: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// The single piece of state this interpreter ever shares across a thread
/// boundary: a spinner that writes directly to stdout while the rest of the
/// program keeps executing (spec.md §5). It never touches the frame stack,
/// the function registry or anything else `Runtime` owns, so no locking is
/// needed anywhere else in the interpreter.
pub struct AnimationHandle {
    running: Option<(Arc<AtomicBool>, JoinHandle<()>)>,
}

impl AnimationHandle {
    pub fn new() -> Self {
        Self { running: None }
    }

    /// Starts (or restarts) the spinner printing `message`. Matches the
    /// reference implementation's habit of silently replacing a still-running
    /// animation rather than erroring.
    pub fn start(&mut self, message: String) {
        self.stop();

        let stop_flag = Arc::new(AtomicBool::new(false));
        let thread_flag = Arc::clone(&stop_flag);
        let handle = std::thread::spawn(move || {
            let mut i = 0usize;
            while !thread_flag.load(Ordering::Relaxed) {
                print!("\r{} {message}", FRAMES[i % FRAMES.len()]);
                let _ = std::io::stdout().flush();
                std::thread::sleep(Duration::from_millis(100));
                i += 1;
            }
            println!();
        });

        self.running = Some((stop_flag, handle));
    }

    /// Signals the spinner to stop and joins it, so output ordering stays
    /// predictable once `animasyon_durdur` returns.
    pub fn stop(&mut self) {
        if let Some((flag, handle)) = self.running.take() {
            flag.store(true, Ordering::Relaxed);
            let _ = handle.join();
        }
    }
}

impl Default for AnimationHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for AnimationHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
