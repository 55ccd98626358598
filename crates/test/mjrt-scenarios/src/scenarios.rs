//! Scenario bodies, written the way the compiler lowers MiniJava programs:
//! plain `extern "C"` routines that only talk to the runtime through its
//! exported symbols.

use core::ptr;
use core::slice;

use mjrt_core::EntryFn;
use mjrt_core::abi::{
    __builtin_alloc_function__, __stdlib_calloc, __stdlib_flush, __stdlib_println,
    __stdlib_read, __stdlib_write, _System_in_read, _System_out_flush, _System_out_println,
    _System_out_write,
};

/// Every scenario the binary can run, by name.
pub const SCENARIOS: &[(&str, EntryFn)] = &[
    ("print-integer", print_integer),
    ("print-extremes", print_extremes),
    ("write-byte", write_byte),
    ("write-byte-wraps", write_byte_wraps),
    ("interleaved", interleaved),
    ("flush-twice", flush_twice),
    ("unflushed-tail", unflushed_tail),
    ("read-two", read_two),
    ("read-sticky-eof", read_sticky_eof),
    ("echo", echo),
    ("zeroed-blocks", zeroed_blocks),
    ("int-array", int_array),
    ("object-list", object_list),
    ("molki-aliases", molki_aliases),
];

/// Looks up a scenario by name.
pub fn lookup(name: &str) -> Option<EntryFn> {
    SCENARIOS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|&(_, entry)| entry)
}

fn is_zeroed(block: *const u8, len: usize) -> bool {
    // SAFETY: Callers pass blocks freshly returned by the allocator with at
    // least `len` bytes.
    unsafe { slice::from_raw_parts(block, len) }
        .iter()
        .all(|&b| b == 0)
}

// ── Output ────────────────────────────────────────────────────────────

extern "C" fn print_integer() {
    // SAFETY: Scenarios run on the single program thread.
    unsafe { _System_out_println(42) }
}

extern "C" fn print_extremes() {
    // SAFETY: Scenarios run on the single program thread.
    unsafe {
        _System_out_println(i32::MIN);
        _System_out_println(i32::MAX);
        _System_out_println(0);
        _System_out_println(-1);
    }
}

extern "C" fn write_byte() {
    // SAFETY: Scenarios run on the single program thread.
    unsafe { _System_out_write(65) }
}

extern "C" fn write_byte_wraps() {
    // SAFETY: Scenarios run on the single program thread.
    unsafe {
        _System_out_write(256 + 66);
        _System_out_write(-1);
        _System_out_write(-256);
    }
}

extern "C" fn interleaved() {
    // SAFETY: Scenarios run on the single program thread.
    unsafe {
        _System_out_write(i32::from(b'a'));
        _System_out_println(7);
        _System_out_write(i32::from(b'b'));
        _System_out_flush();
        _System_out_write(i32::from(b'\n'));
    }
}

extern "C" fn flush_twice() {
    // SAFETY: Scenarios run on the single program thread.
    unsafe {
        _System_out_println(1);
        _System_out_flush();
        _System_out_flush();
    }
}

extern "C" fn unflushed_tail() {
    // SAFETY: Scenarios run on the single program thread.
    unsafe {
        _System_out_write(i32::from(b'o'));
        _System_out_write(i32::from(b'k'));
    }
}

// ── Input ─────────────────────────────────────────────────────────────

extern "C" fn read_two() {
    // SAFETY: Scenarios run on the single program thread.
    unsafe {
        for _ in 0..3 {
            let value = _System_in_read();
            _System_out_println(value);
        }
    }
}

extern "C" fn read_sticky_eof() {
    // SAFETY: Scenarios run on the single program thread.
    unsafe {
        while _System_in_read() != -1 {}
        for _ in 0..3 {
            _System_out_println(_System_in_read());
        }
    }
}

extern "C" fn echo() {
    // SAFETY: Scenarios run on the single program thread.
    unsafe {
        loop {
            let value = _System_in_read();
            if value == -1 {
                break;
            }
            _System_out_write(value);
        }
        _System_out_flush();
    }
}

// ── Allocation ────────────────────────────────────────────────────────

extern "C" fn zeroed_blocks() {
    // SAFETY: Scenarios run on the single program thread; every block is
    // used within the size it was allocated with.
    unsafe {
        let array = __builtin_alloc_function__(4, 3).cast::<u8>();
        let object = __builtin_alloc_function__(8, 1).cast::<u8>();
        let (a, o) = (array as usize, object as usize);
        let ok = !array.is_null()
            && !object.is_null()
            && is_zeroed(array, 12)
            && is_zeroed(object, 8)
            && (a + 12 <= o || o + 8 <= a);
        _System_out_println(i32::from(ok));
    }
}

/// `int[] a = new int[10]; for (i...) a[i] = i * i; println(a[9]);`
extern "C" fn int_array() {
    // SAFETY: Scenarios run on the single program thread; indices stay
    // within the 10 allocated elements.
    unsafe {
        let a = __builtin_alloc_function__(4, 10).cast::<i32>();
        let mut sum = 0;
        for i in 0..10 {
            sum += a.add(i).read();
        }
        _System_out_println(sum);
        for (i, square) in (0..10).map(|v: i32| v * v).enumerate() {
            a.add(i).write(square);
        }
        _System_out_println(a.add(9).read());
    }
}

/// `class Node { int value; Node next; }` chained a thousand times.
extern "C" fn object_list() {
    const NODE_SIZE: u32 = 16;
    const NEXT_OFFSET: usize = 8;

    // SAFETY: Scenarios run on the single program thread; each node is a
    // 16-byte, 16-aligned block with the value at 0 and the link at 8.
    unsafe {
        let mut head: *mut u8 = ptr::null_mut();
        for i in 1..=1000 {
            let node = __builtin_alloc_function__(NODE_SIZE, 1).cast::<u8>();
            if node.add(NEXT_OFFSET).cast::<*mut u8>().read().is_null() {
                node.cast::<i32>().write(i);
                node.add(NEXT_OFFSET).cast::<*mut u8>().write(head);
                head = node;
            }
        }

        let mut sum = 0;
        let mut count = 0;
        let mut cursor = head;
        while !cursor.is_null() {
            sum += cursor.cast::<i32>().read();
            count += 1;
            cursor = cursor.add(NEXT_OFFSET).cast::<*mut u8>().read();
        }
        _System_out_println(count);
        _System_out_println(sum);
    }
}

// ── Alternate symbol family ───────────────────────────────────────────

extern "C" fn molki_aliases() {
    // SAFETY: Scenarios run on the single program thread.
    unsafe {
        let block = __stdlib_calloc(2, 2).cast::<u8>();
        __stdlib_println(i32::from(is_zeroed(block, 4)));
        let byte = __stdlib_read();
        __stdlib_write(byte);
        __stdlib_println(__stdlib_read());
        __stdlib_flush();
    }
}
