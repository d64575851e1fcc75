//! Lox‑source prelude evaluated by [`Lox`](crate::Lox) before user code.

/// A growable `Array` class on top of the fixed‑size `builtin_array` native.
pub const ARRAY: &str = r#"
class Array {
  init() {
    this.buffer = builtin_array(4);
    this.length = 0;
  }

  add(value) {
    this.__ensureSize();
    this.buffer.set(this.length, value);
    this.length = this.length + 1;
  }

  get(index) {
    return this.buffer.get(index);
  }

  removeLast() {
    this.length = this.length - 1;
    var last = this.buffer.get(this.length);
    this.buffer.set(this.length, nil);
    return last;
  }

  __ensureSize() {
    if (this.length == this.buffer.length) {
      var newBuffer = builtin_array(this.buffer.length * 2);
      for (var i = 0; i < this.length; i = i + 1) {
        newBuffer.set(i, this.buffer.get(i));
      }
      this.buffer = newBuffer;
    }
  }
}
"#;

/// Every prelude part, in load order.
pub const PRELUDE: &[&str] = &[ARRAY];
