#![cfg_attr(target_os = "none", no_std)]
#![cfg_attr(target_os = "none", no_main)]

// built for the bare-metal target this is the kernel image. built for a host it runs the same
// boot sequence against an in-memory screen and prints what the VGA display would show.

#[cfg(all(target_os = "none", target_arch = "x86"))]
mod boot;

#[cfg(target_os = "none")]
mod freestanding {
    use core::panic::PanicInfo;
    use core::sync::atomic::{AtomicBool, Ordering};
    use level_os::kernel::{self, Lifecycle};
    use level_os::multiboot::{self, MultibootInfo};
    use level_os::vga_console::CONSOLE;
    use level_os::{arch, config};
    use log::{debug, error};
    use spin::Mutex;

    static LIFECYCLE: Mutex<Lifecycle> = Mutex::new(Lifecycle::new());
    static PANICKING: AtomicBool = AtomicBool::new(false);

    #[no_mangle]
    pub extern "C" fn kernel_main(magic: u32, info: *const MultibootInfo) -> ! {
        #[cfg(feature = "serial-log")]
        let _ = level_os::serial::init(config::LOG_LEVEL);

        let info = match multiboot::verify(magic, unsafe { info.as_ref() }) {
            Ok(info) => info,
            Err(err) => panic!("{}", err),
        };
        debug!(
            "multiboot: flags {:#x}, {} KiB lower, {} KiB upper memory",
            info.flags, info.mem_lower, info.mem_upper
        );

        let result = kernel::run(&mut *CONSOLE.lock(), &mut *LIFECYCLE.lock(), &config::VERSION);
        if let Err(err) = result {
            panic!("{}", err);
        }

        // in a real OS, this would be the scheduler
        arch::halt_forever()
    }

    #[panic_handler]
    fn panic(info: &PanicInfo) -> ! {
        if PANICKING.swap(true, Ordering::SeqCst) {
            // panicked while drawing the panic screen, nothing left to try.
            arch::disable_interrupts();
            arch::halt_forever()
        }
        error!("{}", info);
        unsafe {
            // whoever panicked may have been holding these.
            LIFECYCLE.force_unlock();
            CONSOLE.force_unlock();
        }
        let _ = LIFECYCLE.lock().panic();
        kernel::draw_panic(&mut *CONSOLE.lock(), format_args!("{}", info.message()));

        arch::disable_interrupts();
        arch::halt_forever()
    }
}

#[cfg(not(target_os = "none"))]
fn main() {
    use level_os::config;
    use level_os::kernel::{self, Lifecycle};
    use level_os::vga_console::{Console, MemorySurface, BUFFER_HEIGHT};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut console = Console::new(MemorySurface::new());
    let mut lifecycle = Lifecycle::new();

    // `level-os --panic <message>` previews the panic screen instead of the greeting.
    let args: Vec<String> = std::env::args().skip(1).collect();
    let outcome = match args.first().map(String::as_str) {
        Some("--panic") => Err(args[1..].join(" ")),
        _ => kernel::run(&mut console, &mut lifecycle, &config::VERSION).map_err(|err| err.to_string()),
    };

    if let Err(message) = outcome {
        log::error!("kernel panic: {}", message);
        if let Err(err) = lifecycle.panic() {
            log::warn!("{}", err);
        }
        kernel::draw_panic(&mut console, format_args!("{}", message));
    }

    let surface = console.surface();
    for y in 0..BUFFER_HEIGHT {
        println!("{}", String::from_utf8_lossy(&surface.row(y)).trim_end());
    }
    log::info!("stopped in stage {:?}", lifecycle.stage());
}
