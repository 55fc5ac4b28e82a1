mod sse_test;
